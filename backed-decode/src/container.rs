//! Container views over document nodes
//!
//! These are the keyed, ordered and single-value containers the traversal
//! context opens one segment at a time. All of them borrow the document and
//! are cheap to copy; an [`UnkeyedCursor`] additionally tracks its position.

use crate::document::{type_mismatch, Document, NodeKind};
use backed_path::{BackedError, PathKey, Result};
use serde::de::DeserializeOwned;
use std::fmt;

/// A keyed (map-like) container
pub struct KeyedContainer<'a, D> {
    node: &'a D,
}

impl<'a, D: Document> KeyedContainer<'a, D> {
    /// Open a keyed container on `node`
    pub fn open(node: &'a D) -> Result<Self> {
        match node.kind() {
            NodeKind::Object => Ok(Self { node }),
            _ => Err(type_mismatch(NodeKind::Object, node)),
        }
    }

    /// The underlying node
    pub fn node(&self) -> &'a D {
        self.node
    }

    /// Every key of the container, unordered
    pub fn all_keys(&self) -> Vec<PathKey> {
        self.node.keys()
    }

    /// Whether the container has an entry for `key`
    pub fn contains(&self, key: &str) -> bool {
        self.node.child(key).is_some()
    }

    /// The node stored at `key`
    pub fn get(&self, key: &str) -> Result<&'a D> {
        self.node.child(key).ok_or_else(|| BackedError::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// Open the keyed container stored at `key`
    pub fn nested_keyed(&self, key: &str) -> Result<KeyedContainer<'a, D>> {
        KeyedContainer::open(self.get(key)?)
    }

    /// Open the ordered container stored at `key`
    pub fn nested_unkeyed(&self, key: &str) -> Result<UnkeyedCursor<'a, D>> {
        UnkeyedCursor::open(self.get(key)?)
    }

    /// Decode the value stored at `key`
    pub fn decode<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.get(key)?.decode()
    }
}

impl<D> Clone for KeyedContainer<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for KeyedContainer<'_, D> {}

impl<D> fmt::Debug for KeyedContainer<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedContainer").finish_non_exhaustive()
    }
}

/// A position inside an ordered container
///
/// Elements are consumed front to back: reaching position `i` means
/// skipping every element before it.
pub struct UnkeyedCursor<'a, D> {
    node: &'a D,
    count: usize,
    current_index: usize,
}

impl<'a, D: Document> UnkeyedCursor<'a, D> {
    /// Open an ordered container on `node`, positioned at its first element
    pub fn open(node: &'a D) -> Result<Self> {
        match node.len() {
            Some(count) => Ok(Self {
                node,
                count,
                current_index: 0,
            }),
            None => Err(type_mismatch(NodeKind::Array, node)),
        }
    }

    /// Number of elements in the container
    pub fn count(&self) -> usize {
        self.count
    }

    /// Position of the next element
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Whether every element has been consumed
    pub fn is_at_end(&self) -> bool {
        self.current_index >= self.count
    }

    /// Discard the next element
    pub fn skip(&mut self) -> Result<()> {
        self.next_node().map(|_| ())
    }

    /// Consume and return the next element
    pub fn next_node(&mut self) -> Result<&'a D> {
        let node = self
            .node
            .element(self.current_index)
            .ok_or(BackedError::IndexOutOfBounds {
                index: self.current_index,
                len: self.count,
            })?;
        self.current_index += 1;
        Ok(node)
    }

    /// Skip forward until the next element is the one at `index`
    pub fn advance_to(&mut self, index: usize) -> Result<()> {
        if index < self.current_index {
            return Err(BackedError::invalid_path(
                format!("[{}]", index),
                format!("cursor already consumed position {}", self.current_index - 1),
            ));
        }
        if index >= self.count {
            return Err(BackedError::IndexOutOfBounds {
                index,
                len: self.count,
            });
        }
        while self.current_index < index {
            self.skip()?;
        }
        Ok(())
    }

    /// Consume the next element as a keyed container
    pub fn nested_keyed(&mut self) -> Result<KeyedContainer<'a, D>> {
        KeyedContainer::open(self.next_node()?)
    }

    /// Consume the next element as an ordered container
    pub fn nested_unkeyed(&mut self) -> Result<UnkeyedCursor<'a, D>> {
        UnkeyedCursor::open(self.next_node()?)
    }

    /// Consume and decode the next element
    pub fn decode_next<T: DeserializeOwned>(&mut self) -> Result<T> {
        self.next_node()?.decode()
    }
}

impl<D> Clone for UnkeyedCursor<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for UnkeyedCursor<'_, D> {}

impl<D> fmt::Debug for UnkeyedCursor<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnkeyedCursor")
            .field("count", &self.count)
            .field("current_index", &self.current_index)
            .finish()
    }
}

/// A container holding exactly one scalar or composite value
pub struct SingleValueContainer<'a, D> {
    node: &'a D,
}

impl<'a, D: Document> SingleValueContainer<'a, D> {
    /// Wrap `node`
    pub fn new(node: &'a D) -> Self {
        Self { node }
    }

    /// Whether the value is null
    pub fn is_null(&self) -> bool {
        self.node.kind() == NodeKind::Null
    }

    /// Decode the value
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        self.node.decode()
    }
}
