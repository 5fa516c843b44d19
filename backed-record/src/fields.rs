//! The result of one decode pass over a record schema

use ahash::AHashMap;
use std::any::{type_name, Any};
use std::fmt;

/// Decoded field values keyed by registered name
///
/// Produced once by [`RecordSchema::decode`](crate::RecordSchema::decode)
/// and handed to [`BackedDecodable::from_fields`](crate::BackedDecodable::from_fields),
/// which moves each value out with [`DecodedFields::take`].
#[derive(Default)]
pub struct DecodedFields {
    values: AHashMap<String, Box<dyn Any + Send>>,
}

impl DecodedFields {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            values: AHashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, name: String, value: Box<dyn Any + Send>) {
        self.values.insert(name, value);
    }

    /// Number of values not yet taken
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether every value has been taken
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether a value is available under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Move the value of field `name` out
    ///
    /// # Panics
    ///
    /// Panics if no field named `name` was registered (or it was already
    /// taken), or if it was registered with a type other than `T`. Both are
    /// programming errors in the record's registration, not decode failures.
    pub fn take<T: 'static>(&mut self, name: &str) -> T {
        let value = match self.values.remove(name) {
            Some(value) => value,
            None => panic!("field `{}` was not registered or was already taken", name),
        };
        match value.downcast::<T>() {
            Ok(value) => *value,
            Err(_) => panic!(
                "field `{}` was registered with a different type than `{}`",
                name,
                type_name::<T>()
            ),
        }
    }

    /// Move the value of field `name` out if it exists with type `T`
    ///
    /// A value of another type is left in place.
    pub fn try_take<T: 'static>(&mut self, name: &str) -> Option<T> {
        if !self.values.get(name)?.is::<T>() {
            return None;
        }
        self.values
            .remove(name)
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
    }

    /// Borrow the value of field `name`
    ///
    /// # Panics
    ///
    /// Same conditions as [`DecodedFields::take`].
    pub fn get<T: 'static>(&self, name: &str) -> &T {
        let value = match self.values.get(name) {
            Some(value) => value,
            None => panic!("field `{}` was not registered or was already taken", name),
        };
        match value.downcast_ref::<T>() {
            Some(value) => value,
            None => panic!(
                "field `{}` was registered with a different type than `{}`",
                name,
                type_name::<T>()
            ),
        }
    }
}

impl fmt::Debug for DecodedFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("DecodedFields").field("names", &names).finish()
    }
}
