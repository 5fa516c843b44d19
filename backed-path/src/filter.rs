//! Typed predicates selecting a subset of a keyed container's entries

use crate::error::Result;
use crate::key::PathKey;
use serde::de::{DeserializeOwned, IgnoredAny};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// One keyed-container entry offered to a [`PathFilter`]
///
/// Implemented by the decoding layer; the value is only materialised as JSON
/// when the predicate asks for it.
pub trait FilterSubject {
    /// The entry's key
    fn key(&self) -> &PathKey;

    /// The entry's value as a JSON tree
    fn value_json(&self) -> Result<serde_json::Value>;
}

type Predicate = dyn Fn(&dyn FilterSubject) -> Result<bool> + Send + Sync;

static NEXT_FILTER_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque predicate over a (key, value) pair
///
/// Filters wrap arbitrary closures, so they have identity rather than
/// structural equality: two filters are equal only when one is a clone of
/// the other.
#[derive(Clone)]
pub struct PathFilter {
    id: u64,
    predicate: Arc<Predicate>,
}

impl PathFilter {
    /// Create a filter from a predicate over the decoded key and value
    ///
    /// Entries whose key or value cannot be decoded at `K` / `V` are excluded.
    pub fn new<K, V, F>(predicate: F) -> Self
    where
        K: DeserializeOwned + 'static,
        V: DeserializeOwned + 'static,
        F: Fn(K, V) -> bool + Send + Sync + 'static,
    {
        Self::from_predicate(move |subject: &dyn FilterSubject| {
            let key = subject.key().decode::<K>()?;
            let value = serde_json::from_value::<V>(subject.value_json()?)?;
            Ok(predicate(key, value))
        })
    }

    /// Create a filter that only looks at the decoded key
    pub fn keys<K, F>(predicate: F) -> Self
    where
        K: DeserializeOwned + 'static,
        F: Fn(K) -> bool + Send + Sync + 'static,
    {
        Self::from_predicate(move |subject: &dyn FilterSubject| {
            Ok(predicate(subject.key().decode::<K>()?))
        })
    }

    /// Create a filter that only looks at the decoded value
    pub fn values<V, F>(predicate: F) -> Self
    where
        V: DeserializeOwned + 'static,
        F: Fn(V) -> bool + Send + Sync + 'static,
    {
        Self::new(move |_: IgnoredAny, value: V| predicate(value))
    }

    fn from_predicate<F>(predicate: F) -> Self
    where
        F: Fn(&dyn FilterSubject) -> Result<bool> + Send + Sync + 'static,
    {
        Self {
            id: NEXT_FILTER_ID.fetch_add(1, Ordering::Relaxed),
            predicate: Arc::new(predicate),
        }
    }

    /// Evaluate the filter, treating decode failures as "excluded"
    pub fn matches(&self, subject: &dyn FilterSubject) -> bool {
        (self.predicate)(subject).unwrap_or(false)
    }
}

impl PartialEq for PathFilter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PathFilter {}

impl std::hash::Hash for PathFilter {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for PathFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathFilter").field("id", &self.id).finish()
    }
}
