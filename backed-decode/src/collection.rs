//! Collections decoded element by element, with optional lossy skipping

use crate::date::DateStrategy;
use crate::document::Document;
use crate::located::Located;
use backed_path::{DecodingOptions, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::hash::Hash;
use tracing::trace;

/// Decode every element of a sequence target with `decode_one`
///
/// In lossy mode failing elements are dropped; otherwise the first failure
/// is returned.
pub fn decode_elements<'a, D, T, C, F>(
    located: &Located<'a, D>,
    options: DecodingOptions,
    mut decode_one: F,
) -> Result<C>
where
    D: Document,
    C: FromIterator<T>,
    F: FnMut(&Located<'a, D>) -> Result<T>,
{
    let elements = located.elements()?;
    if !options.is_lossy() {
        return elements.iter().map(decode_one).collect();
    }

    Ok(elements
        .iter()
        .enumerate()
        .filter_map(|(position, element)| match decode_one(element) {
            Ok(value) => Some(value),
            Err(e) => {
                trace!(position, error = %e, "dropping undecodable element");
                None
            }
        })
        .collect())
}

/// Decode a sequence target into an array, preserving order
pub fn decode_array<D, T>(located: &Located<'_, D>, options: DecodingOptions) -> Result<Vec<T>>
where
    D: Document,
    T: DeserializeOwned,
{
    decode_elements(located, options, |element| element.decode())
}

/// Decode a sequence target into a set
pub fn decode_set<D, T>(located: &Located<'_, D>, options: DecodingOptions) -> Result<HashSet<T>>
where
    D: Document,
    T: DeserializeOwned + Eq + Hash,
{
    decode_elements(located, options, |element| element.decode())
}

/// Decode each element of a sequence target as a date
pub fn decode_dates<D>(
    located: &Located<'_, D>,
    strategy: &DateStrategy,
    options: DecodingOptions,
) -> Result<Vec<DateTime<Utc>>>
where
    D: Document,
{
    decode_elements(located, options, |element| strategy.decode(element))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::KeyedContainer;
    use crate::entry::EntrySet;
    use backed_path::{BackedError, EntryKind, Limits};
    use serde::Deserialize;
    use serde_json::{json, Value};

    #[derive(Debug, PartialEq, Eq, Hash, Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum Fruit {
        Apples,
        Bananas,
    }

    #[test]
    fn lossy_strings_drop_numbers() {
        let doc = json!([12, "34", 56, "78"]);
        let values: Vec<String> = decode_array(&Located::Node(&doc), DecodingOptions::LOSSY).unwrap();
        assert_eq!(values, vec!["34", "78"]);

        let values: Vec<i64> = decode_array(&Located::Node(&doc), DecodingOptions::LOSSY).unwrap();
        assert_eq!(values, vec![12, 56]);
    }

    #[test]
    fn strict_arrays_fail_on_first_bad_element() {
        let doc = json!([12, "34"]);
        let result: Result<Vec<i64>> = decode_array(&Located::Node(&doc), DecodingOptions::STRICT);
        assert!(matches!(result, Err(BackedError::Json(_))));

        let doc = json!([1, 2]);
        let values: Vec<i64> = decode_array(&Located::Node(&doc), DecodingOptions::default()).unwrap();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn lossy_does_not_hide_a_missing_sequence() {
        let doc = json!("not an array");
        let result: Result<Vec<String>> = decode_array(&Located::Node(&doc), DecodingOptions::LOSSY);
        assert!(matches!(result, Err(BackedError::TypeMismatch { .. })));
    }

    #[test]
    fn sets_deduplicate() {
        let doc = json!([1, 2, 2, 3, 1]);
        let values: HashSet<u8> = decode_set(&Located::Node(&doc), DecodingOptions::STRICT).unwrap();
        assert_eq!(values, HashSet::from([1, 2, 3]));
    }

    #[test]
    fn entry_set_keys_as_enum_lossy() {
        let doc = json!({"apples": 12, "oranges": 9, "bananas": 6});
        let keyed = KeyedContainer::open(&doc).unwrap();
        let set = EntrySet::materialize(keyed, EntryKind::Key, None, &Limits::default()).unwrap();
        let located = Located::Entries(set);

        let fruits: Vec<Fruit> = decode_array(&located, DecodingOptions::LOSSY).unwrap();
        assert_eq!(fruits, vec![Fruit::Apples, Fruit::Bananas]);

        let strict: Result<Vec<Fruit>> = decode_array(&located, DecodingOptions::STRICT);
        assert!(matches!(strict, Err(BackedError::KeyDecode { .. })));
    }

    #[test]
    fn lossy_dates() {
        let doc = json!([1613984296, "N/A", 1613984996]);
        let located = Located::Node(&doc);
        let dates = decode_dates(&located, &DateStrategy::SecondsSince1970, DecodingOptions::LOSSY)
            .unwrap();
        let stamps: Vec<i64> = dates.iter().map(DateTime::timestamp).collect();
        assert_eq!(stamps, vec![1613984296, 1613984996]);

        assert!(
            decode_dates(&located, &DateStrategy::SecondsSince1970, DecodingOptions::STRICT)
                .is_err()
        );
    }

    #[test]
    fn decode_elements_with_custom_function() {
        let doc = json!(["a", "b", "a"]);
        let values: Vec<Value> =
            decode_elements(&Located::Node(&doc), DecodingOptions::STRICT, |e| e.to_json()).unwrap();
        assert_eq!(values, vec![json!("a"), json!("b"), json!("a")]);
    }
}
