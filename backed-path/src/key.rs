//! Keyed-container keys and their deterministic ordering

use crate::error::{BackedError, Result};
use serde::de::value::Error as ValueError;
use serde::de::{DeserializeOwned, IntoDeserializer};
use std::cmp::Ordering;
use std::fmt;

/// A key of a keyed container
///
/// Every key has a string representation. Keys whose string is a canonical
/// integer (`"7"`, `"-3"`, but not `"07"` or `"+3"`) also carry an integer
/// representation, which takes part in ordering and decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathKey {
    string_value: String,
    int_value: Option<i64>,
}

impl PathKey {
    /// Create a key from its string representation
    pub fn new(key: impl Into<String>) -> Self {
        let string_value = key.into();
        let int_value = parse_canonical_int(&string_value);
        Self {
            string_value,
            int_value,
        }
    }

    /// Create an integer key
    pub fn int(value: i64) -> Self {
        Self {
            string_value: value.to_string(),
            int_value: Some(value),
        }
    }

    /// String representation
    pub fn as_str(&self) -> &str {
        &self.string_value
    }

    /// Integer representation, if the key is a canonical integer
    pub fn int_value(&self) -> Option<i64> {
        self.int_value
    }

    /// Decode the key itself as a `T`
    ///
    /// The integer representation is tried first when present, then the
    /// string representation, so both `u32` and `String` (or a string-valued
    /// enum) can be decoded from the key `"12"`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        if let Some(int) = self.int_value {
            let de: serde::de::value::I64Deserializer<ValueError> = int.into_deserializer();
            if let Ok(value) = T::deserialize(de) {
                return Ok(value);
            }
        }
        let de: serde::de::value::StrDeserializer<'_, ValueError> =
            self.string_value.as_str().into_deserializer();
        T::deserialize(de).map_err(|e| BackedError::KeyDecode {
            key: self.string_value.clone(),
            reason: e.to_string(),
        })
    }
}

impl Ord for PathKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.int_value, other.int_value) {
            (Some(lhs), Some(rhs)) => lhs
                .cmp(&rhs)
                .then_with(|| self.string_value.cmp(&other.string_value)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.string_value.cmp(&other.string_value),
        }
    }
}

impl PartialOrd for PathKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string_value)
    }
}

impl From<&str> for PathKey {
    fn from(value: &str) -> Self {
        PathKey::new(value)
    }
}

impl From<String> for PathKey {
    fn from(value: String) -> Self {
        PathKey::new(value)
    }
}

fn parse_canonical_int(s: &str) -> Option<i64> {
    let value = s.parse::<i64>().ok()?;
    (value.to_string() == s).then_some(value)
}
