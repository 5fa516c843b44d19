//! Minimal capability interface over an in-memory tree document

use backed_path::{BackedError, PathKey, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Shape of a document node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Null
    Null,
    /// Boolean
    Bool,
    /// Number
    Number,
    /// String
    String,
    /// Ordered sequence
    Array,
    /// Keyed map
    Object,
}

impl NodeKind {
    /// Lower-case name used in error messages
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Null => "null",
            NodeKind::Bool => "bool",
            NodeKind::Number => "number",
            NodeKind::String => "string",
            NodeKind::Array => "array",
            NodeKind::Object => "object",
        }
    }
}

/// A read-only tree document the engine can walk
///
/// Keyed access and key enumeration are only meaningful on
/// [`NodeKind::Object`] nodes, positional access only on
/// [`NodeKind::Array`] nodes; other kinds report no children.
pub trait Document {
    /// Kind of this node
    fn kind(&self) -> NodeKind;

    /// Child at `key` of a keyed node
    fn child(&self, key: &str) -> Option<&Self>;

    /// Every key of a keyed node, in the document's own order
    fn keys(&self) -> Vec<PathKey>;

    /// Number of elements of an ordered node
    fn len(&self) -> Option<usize>;

    /// Element at `index` of an ordered node
    fn element(&self, index: usize) -> Option<&Self>;

    /// Decode this node as a `T`
    fn decode<T: DeserializeOwned>(&self) -> Result<T>;

    /// Copy this node out as a JSON tree
    fn to_json(&self) -> Result<Value>;
}

impl Document for Value {
    fn kind(&self) -> NodeKind {
        match self {
            Value::Null => NodeKind::Null,
            Value::Bool(_) => NodeKind::Bool,
            Value::Number(_) => NodeKind::Number,
            Value::String(_) => NodeKind::String,
            Value::Array(_) => NodeKind::Array,
            Value::Object(_) => NodeKind::Object,
        }
    }

    fn child(&self, key: &str) -> Option<&Self> {
        self.as_object()?.get(key)
    }

    fn keys(&self) -> Vec<PathKey> {
        self.as_object()
            .map(|map| map.keys().map(|k| PathKey::new(k.as_str())).collect())
            .unwrap_or_default()
    }

    fn len(&self) -> Option<usize> {
        self.as_array().map(Vec::len)
    }

    fn element(&self, index: usize) -> Option<&Self> {
        self.as_array()?.get(index)
    }

    fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        T::deserialize(self).map_err(BackedError::from)
    }

    fn to_json(&self) -> Result<Value> {
        Ok(self.clone())
    }
}

/// Build a [`BackedError::TypeMismatch`] for a node of the wrong kind
pub(crate) fn type_mismatch<D: Document + ?Sized>(expected: NodeKind, node: &D) -> BackedError {
    BackedError::TypeMismatch {
        expected: expected.name(),
        found: node.kind().name(),
    }
}
