//! The resolved target of one route

use crate::container::{SingleValueContainer, UnkeyedCursor};
use crate::document::{Document, NodeKind};
use crate::entry::{DeferredEntry, EntrySet};
use backed_path::{BackedError, EntryKind, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// What a route points at once every container along it has been opened
pub enum Located<'a, D> {
    /// A document node
    Node(&'a D),
    /// One entry picked out of an entry set by index
    Entry(DeferredEntry<'a, D>),
    /// A whole entry set, from a route ending on a wildcard
    Entries(EntrySet<'a, D>),
}

impl<'a, D: Document> Located<'a, D> {
    /// Decode the target as a single `T`
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            Located::Node(node) => SingleValueContainer::new(*node).decode(),
            Located::Entry(entry) => entry.decode(),
            Located::Entries(set) => Err(BackedError::invalid_path(
                wildcard_display(set.kind()),
                "a wildcard selects a sequence of entries and cannot be decoded as one value",
            )),
        }
    }

    /// Whether the target is an explicit `null`
    pub fn is_null(&self) -> bool {
        match self {
            Located::Node(node) => node.kind() == NodeKind::Null,
            Located::Entry(entry) if entry.kind() == EntryKind::Value => entry
                .value_node()
                .map(|node| node.kind() == NodeKind::Null)
                .unwrap_or(false),
            _ => false,
        }
    }

    /// The target as a JSON tree
    pub fn to_json(&self) -> Result<Value> {
        match self {
            Located::Node(node) => node.to_json(),
            Located::Entry(entry) => entry.to_json(),
            Located::Entries(set) => set
                .iter()
                .map(DeferredEntry::to_json)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
        }
    }

    /// Number of elements of a sequence target
    pub fn count(&self) -> Result<usize> {
        match self {
            Located::Entries(set) => Ok(set.len()),
            _ => Ok(UnkeyedCursor::open(self.sequence_node()?)?.count()),
        }
    }

    /// Split a sequence target into its elements, in order
    ///
    /// Ordered nodes yield their elements; entry sets yield their entries.
    /// An entry holding an ordered value yields the elements of that value.
    pub fn elements(&self) -> Result<Vec<Located<'a, D>>> {
        match self {
            Located::Entries(set) => Ok(set.iter().cloned().map(Located::Entry).collect()),
            _ => {
                let mut cursor = UnkeyedCursor::open(self.sequence_node()?)?;
                let mut elements = Vec::with_capacity(cursor.count());
                while !cursor.is_at_end() {
                    elements.push(Located::Node(cursor.next_node()?));
                }
                Ok(elements)
            }
        }
    }

    fn sequence_node(&self) -> Result<&'a D> {
        match self {
            Located::Node(node) => Ok(*node),
            Located::Entry(entry) => match entry.kind() {
                EntryKind::Value => entry.value_node(),
                EntryKind::Key => Err(BackedError::TypeMismatch {
                    expected: NodeKind::Array.name(),
                    found: "key",
                }),
            },
            Located::Entries(set) => Err(BackedError::invalid_path(
                wildcard_display(set.kind()),
                "entry set has no backing node",
            )),
        }
    }
}

fn wildcard_display(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Key => "[~]",
        EntryKind::Value => "[*]",
    }
}

impl<D> fmt::Debug for Located<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Located::Node(_) => f.write_str("Node"),
            Located::Entry(entry) => f.debug_tuple("Entry").field(entry).finish(),
            Located::Entries(set) => f.debug_tuple("Entries").field(set).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::KeyedContainer;
    use backed_path::Limits;
    use serde_json::json;

    #[test]
    fn node_targets_decode_and_split() {
        let doc = json!([1, "two", 3]);
        let located = Located::Node(&doc);
        assert_eq!(located.count().unwrap(), 3);
        let elements = located.elements().unwrap();
        assert_eq!(elements[0].decode::<i64>().unwrap(), 1);
        assert_eq!(elements[1].decode::<String>().unwrap(), "two");
        assert_eq!(located.to_json().unwrap(), doc);
    }

    #[test]
    fn scalar_nodes_are_not_sequences() {
        let doc = json!("Steve");
        let located = Located::Node(&doc);
        assert!(matches!(
            located.count(),
            Err(BackedError::TypeMismatch {
                expected: "array",
                found: "string"
            })
        ));
    }

    #[test]
    fn entry_sets_are_sequences_not_values() {
        let doc = json!({"b": 2, "a": 1});
        let keyed = KeyedContainer::open(&doc).unwrap();
        let set = EntrySet::materialize(keyed, EntryKind::Value, None, &Limits::default()).unwrap();
        let located = Located::Entries(set);
        assert_eq!(located.count().unwrap(), 2);
        assert_eq!(located.to_json().unwrap(), json!([1, 2]));
        assert!(matches!(
            located.decode::<i64>(),
            Err(BackedError::InvalidPath { .. })
        ));
    }

    #[test]
    fn value_entries_holding_arrays_are_sequences() {
        let doc = json!({"dates": [1, 2, 3]});
        let keyed = KeyedContainer::open(&doc).unwrap();
        let set = EntrySet::materialize(keyed, EntryKind::Value, None, &Limits::default()).unwrap();
        let located = Located::Entry(set.get(0).unwrap().clone());
        assert_eq!(located.count().unwrap(), 3);

        let keys = EntrySet::materialize(keyed, EntryKind::Key, None, &Limits::default()).unwrap();
        let located = Located::Entry(keys.get(0).unwrap().clone());
        assert!(located.elements().is_err());
    }
}
