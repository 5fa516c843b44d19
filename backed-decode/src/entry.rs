//! Deferred entries and the ordered entry sets built from wildcards

use crate::container::KeyedContainer;
use crate::document::Document;
use backed_path::{BackedError, EntryKind, FilterSubject, Limits, PathFilter, PathKey, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use tracing::trace;

/// A lazily decoded entry of a keyed container
///
/// Nothing is decoded until [`DeferredEntry::decode`] is called; the entry
/// only remembers which side to decode and where the entry lives.
pub struct DeferredEntry<'a, D> {
    kind: EntryKind,
    key: PathKey,
    container: KeyedContainer<'a, D>,
}

impl<'a, D: Document> DeferredEntry<'a, D> {
    /// Create an entry for `key` in `container`
    pub fn new(kind: EntryKind, key: PathKey, container: KeyedContainer<'a, D>) -> Self {
        Self {
            kind,
            key,
            container,
        }
    }

    /// Which side of the entry this handle decodes
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// The entry's key
    pub fn key(&self) -> &PathKey {
        &self.key
    }

    /// The node holding the entry's value
    pub fn value_node(&self) -> Result<&'a D> {
        self.container.get(self.key.as_str())
    }

    /// Decode the selected side of the entry
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        match self.kind {
            EntryKind::Key => self.key.decode(),
            EntryKind::Value => self.value_node()?.decode(),
        }
    }

    /// The selected side of the entry as JSON
    ///
    /// Keys with an integer representation become JSON numbers.
    pub fn to_json(&self) -> Result<Value> {
        match self.kind {
            EntryKind::Key => Ok(match self.key.int_value() {
                Some(int) => Value::from(int),
                None => Value::String(self.key.as_str().to_string()),
            }),
            EntryKind::Value => self.value_node()?.to_json(),
        }
    }
}

impl<D: Document> FilterSubject for DeferredEntry<'_, D> {
    fn key(&self) -> &PathKey {
        &self.key
    }

    fn value_json(&self) -> Result<Value> {
        self.value_node()?.to_json()
    }
}

impl<D> Clone for DeferredEntry<'_, D> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            key: self.key.clone(),
            container: self.container,
        }
    }
}

impl<D> fmt::Debug for DeferredEntry<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredEntry")
            .field("kind", &self.kind)
            .field("key", &self.key)
            .finish()
    }
}

/// The entries of one keyed container selected by a wildcard segment,
/// in deterministic key order
pub struct EntrySet<'a, D> {
    kind: EntryKind,
    entries: Vec<DeferredEntry<'a, D>>,
}

impl<'a, D: Document> EntrySet<'a, D> {
    /// Select the entries of `container`
    ///
    /// Keys are sorted (integer keys by value, then string keys) before the
    /// optional filter runs, so positions are stable across calls.
    pub fn materialize(
        container: KeyedContainer<'a, D>,
        kind: EntryKind,
        filter: Option<&PathFilter>,
        limits: &Limits,
    ) -> Result<Self> {
        let mut keys = container.all_keys();
        if keys.len() > limits.max_entry_set_len {
            return Err(BackedError::LimitExceeded(format!(
                "Entry set of {} keys exceeds limit {}",
                keys.len(),
                limits.max_entry_set_len
            )));
        }
        keys.sort();

        let total = keys.len();
        let entries: Vec<_> = keys
            .into_iter()
            .map(|key| DeferredEntry::new(kind, key, container))
            .filter(|entry| filter.map_or(true, |f| f.matches(entry)))
            .collect();

        trace!(
            ?kind,
            total,
            selected = entries.len(),
            filtered = filter.is_some(),
            "materialized entry set"
        );

        Ok(Self { kind, entries })
    }

    /// Which side of each entry is decoded
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Number of selected entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry was selected
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`
    pub fn get(&self, index: usize) -> Result<&DeferredEntry<'a, D>> {
        self.entries.get(index).ok_or(BackedError::IndexOutOfBounds {
            index,
            len: self.entries.len(),
        })
    }

    /// Iterate the entries in order
    pub fn iter(&self) -> std::slice::Iter<'_, DeferredEntry<'a, D>> {
        self.entries.iter()
    }
}

impl<D> Clone for EntrySet<'_, D> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            entries: self.entries.clone(),
        }
    }
}

impl<D> fmt::Debug for EntrySet<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntrySet")
            .field("kind", &self.kind)
            .field("entries", &self.entries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn counts() -> Value {
        json!({"oranges": 9, "apples": 12, "bananas": 6})
    }

    #[test]
    fn keys_are_sorted() {
        let doc = counts();
        let keyed = KeyedContainer::open(&doc).unwrap();
        let set = EntrySet::materialize(keyed, EntryKind::Key, None, &Limits::default()).unwrap();
        let keys: Vec<String> = set.iter().map(|e| e.decode().unwrap()).collect();
        assert_eq!(keys, vec!["apples", "bananas", "oranges"]);
    }

    #[test]
    fn values_align_with_keys() {
        let doc = counts();
        let keyed = KeyedContainer::open(&doc).unwrap();
        let keys = EntrySet::materialize(keyed, EntryKind::Key, None, &Limits::default()).unwrap();
        let values =
            EntrySet::materialize(keyed, EntryKind::Value, None, &Limits::default()).unwrap();
        for (k, v) in keys.iter().zip(values.iter()) {
            let key: String = k.decode().unwrap();
            let value: i64 = v.decode().unwrap();
            assert_eq!(doc[key.as_str()], json!(value));
        }
    }

    #[test]
    fn filter_is_applied_after_sorting() {
        let doc = counts();
        let keyed = KeyedContainer::open(&doc).unwrap();
        let small = PathFilter::values(|count: i64| count < 10);
        let set =
            EntrySet::materialize(keyed, EntryKind::Key, Some(&small), &Limits::default()).unwrap();
        let keys: Vec<String> = set.iter().map(|e| e.decode().unwrap()).collect();
        assert_eq!(keys, vec!["bananas", "oranges"]);
        assert_eq!(set.get(0).unwrap().key().as_str(), "bananas");
        assert!(matches!(
            set.get(2),
            Err(BackedError::IndexOutOfBounds { index: 2, len: 2 })
        ));
    }

    #[test]
    fn entry_set_limit_is_enforced() {
        let doc = counts();
        let keyed = KeyedContainer::open(&doc).unwrap();
        let limits = Limits {
            max_entry_set_len: 2,
            ..Limits::default()
        };
        assert!(matches!(
            EntrySet::materialize(keyed, EntryKind::Value, None, &limits),
            Err(BackedError::LimitExceeded(_))
        ));
    }

    #[test]
    fn key_entries_render_integer_keys_as_numbers() {
        let doc = json!({"1613984296": "start", "label": "x"});
        let keyed = KeyedContainer::open(&doc).unwrap();
        let set = EntrySet::materialize(keyed, EntryKind::Key, None, &Limits::default()).unwrap();
        assert_eq!(set.get(0).unwrap().to_json().unwrap(), json!(1613984296));
        assert_eq!(set.get(1).unwrap().to_json().unwrap(), json!("label"));
        assert_eq!(set.get(0).unwrap().decode::<i64>().unwrap(), 1613984296);
    }
}
