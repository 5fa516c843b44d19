//! Resolving paths (all alternatives) against a document

use crate::collection;
use crate::context::TraversalContext;
use crate::date::DateStrategy;
use crate::document::Document;
use crate::located::Located;
use backed_path::{BackedError, DecodingOptions, Limits, Path, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::hash::Hash;
use tracing::debug;

/// Decodes values out of one document by path
///
/// Every operation tries the path's routes in order and returns the first
/// success. When every route fails, the last route's error is returned;
/// earlier failures are logged at `debug` level.
///
/// ```
/// use backed_decode::Resolver;
/// use backed_path::Path;
/// use serde_json::json;
///
/// let doc = json!({"name": "Steve"});
/// let path = Path::from("full_name").or_else("name");
/// let name: String = Resolver::new(&doc).value(&path).unwrap();
/// assert_eq!(name, "Steve");
/// ```
#[derive(Debug)]
pub struct Resolver<'a, D> {
    root: &'a D,
    limits: Limits,
}

impl<D> Clone for Resolver<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Resolver<'_, D> {}

impl<'a, D: Document> Resolver<'a, D> {
    /// Create a resolver over `root` with default limits
    pub fn new(root: &'a D) -> Self {
        Self {
            root,
            limits: Limits::default(),
        }
    }

    /// Use custom limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// The document root
    pub fn root(&self) -> &'a D {
        self.root
    }

    /// Limits applied to every resolution
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Locate each route of `path` in turn and hand the target to `decode`
    ///
    /// A route fails if any container along it cannot be opened, if its
    /// target cannot be located, or if `decode` fails; the next route is
    /// then tried.
    pub fn resolve<T, F>(&self, path: &Path, mut decode: F) -> Result<T>
    where
        F: FnMut(&Located<'a, D>) -> Result<T>,
    {
        let routes = path.routes();
        if routes.len() > self.limits.max_alternatives {
            return Err(BackedError::LimitExceeded(format!(
                "Path has {} alternatives, limit is {}",
                routes.len(),
                self.limits.max_alternatives
            )));
        }

        let mut last_error = None;
        for (i, route) in routes.iter().enumerate() {
            let attempt = TraversalContext::new(self.root, route, &self.limits)
                .and_then(|context| context.locate())
                .and_then(|located| decode(&located));

            match attempt {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if i + 1 < routes.len() {
                        debug!(
                            route = %route,
                            alternative = i,
                            shape = e.is_shape_error(),
                            error = %e,
                            "route failed, trying next alternative"
                        );
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| BackedError::invalid_path(path, "path has no routes")))
    }

    /// Decode a single value
    pub fn value<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        self.resolve(path, |located| located.decode())
    }

    /// Decode an ordered sequence (array or wildcard selection)
    pub fn array<T: DeserializeOwned>(&self, path: &Path, options: DecodingOptions) -> Result<Vec<T>> {
        self.resolve(path, |located| collection::decode_array(located, options))
    }

    /// Decode a sequence into a set
    pub fn set<T>(&self, path: &Path, options: DecodingOptions) -> Result<HashSet<T>>
    where
        T: DeserializeOwned + Eq + Hash,
    {
        self.resolve(path, |located| collection::decode_set(located, options))
    }

    /// Decode a single date
    pub fn date(&self, path: &Path, strategy: &DateStrategy) -> Result<DateTime<Utc>> {
        self.resolve(path, |located| strategy.decode(located))
    }

    /// Decode a sequence of dates, one element at a time
    pub fn dates(
        &self,
        path: &Path,
        strategy: &DateStrategy,
        options: DecodingOptions,
    ) -> Result<Vec<DateTime<Utc>>> {
        self.resolve(path, |located| {
            collection::decode_dates(located, strategy, options)
        })
    }

    /// Number of elements of the sequence at `path`
    pub fn count(&self, path: &Path) -> Result<usize> {
        self.resolve(path, |located| located.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc() -> Value {
        json!({
            "name": "Steve",
            "values": [12, "34", 56, "78"],
            "counts": {"apples": 12, "oranges": 9, "bananas": 6}
        })
    }

    #[test]
    fn first_successful_alternative_wins() {
        let doc = doc();
        let path = Path::from("full_name").or_else("name").or_else("first_name");
        let name: String = Resolver::new(&doc).value(&path).unwrap();
        assert_eq!(name, "Steve");
    }

    #[test]
    fn decode_failure_moves_to_next_alternative() {
        let doc = json!({"a": "not a number", "b": 7});
        let path = Path::from("a").or_else("b");
        let value: i64 = Resolver::new(&doc).value(&path).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn last_error_is_surfaced() {
        let doc = doc();
        let path = Path::from("values").index(0).or_else("missing");
        let err = Resolver::new(&doc).value::<String>(&path).unwrap_err();
        assert!(matches!(err, BackedError::KeyNotFound { key } if key == "missing"));
    }

    #[test]
    fn resolving_twice_is_idempotent() {
        let doc = doc();
        let path = Path::from("counts").all_keys().index(1);
        let resolver = Resolver::new(&doc);
        let first: String = resolver.value(&path).unwrap();
        let second: String = resolver.value(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "bananas");
        assert_eq!(path.to_string(), "$.counts[~][1]");
    }

    #[test]
    fn arrays_sets_and_counts() {
        let doc = doc();
        let resolver = Resolver::new(&doc);
        let values: Vec<String> = resolver
            .array(&Path::from("values"), DecodingOptions::LOSSY)
            .unwrap();
        assert_eq!(values, vec!["34", "78"]);

        let counts: HashSet<i64> = resolver
            .set(&Path::from("counts").all_values(), DecodingOptions::STRICT)
            .unwrap();
        assert_eq!(counts, HashSet::from([6, 9, 12]));

        assert_eq!(resolver.count(&Path::from("values")).unwrap(), 4);
        assert_eq!(resolver.count(&Path::from("counts").all_keys()).unwrap(), 3);
    }

    #[test]
    fn alternative_limit_is_enforced() {
        let doc = doc();
        let path = Path::from("a").or_else("b").or_else("name");
        let limits = Limits {
            max_alternatives: 2,
            ..Limits::default()
        };
        let err = Resolver::new(&doc)
            .with_limits(limits)
            .value::<String>(&path)
            .unwrap_err();
        assert!(matches!(err, BackedError::LimitExceeded(_)));
    }
}
