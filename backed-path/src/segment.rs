//! Route segments

use crate::filter::PathFilter;
use std::fmt;

/// One step of a route
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Entry of a keyed container
    Key(String),
    /// Position in an ordered container
    Index(usize),
    /// Every key of a keyed container, in key order
    AllKeys,
    /// Every value of a keyed container, in key order
    AllValues,
    /// Keys of the entries accepted by a filter, in key order
    FilteredKeys(PathFilter),
    /// Values of the entries accepted by a filter, in key order
    FilteredValues(PathFilter),
}

/// Which side of a keyed container's entries a wildcard selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Decode the entry's key
    Key,
    /// Decode the entry's value
    Value,
}

impl Segment {
    /// Whether this segment selects a set of keyed-container entries
    pub fn is_wildcard(&self) -> bool {
        matches!(
            self,
            Segment::AllKeys
                | Segment::AllValues
                | Segment::FilteredKeys(_)
                | Segment::FilteredValues(_)
        )
    }

    /// The entry side and optional filter of a wildcard segment
    pub fn as_wildcard(&self) -> Option<(EntryKind, Option<&PathFilter>)> {
        match self {
            Segment::AllKeys => Some((EntryKind::Key, None)),
            Segment::AllValues => Some((EntryKind::Value, None)),
            Segment::FilteredKeys(filter) => Some((EntryKind::Key, Some(filter))),
            Segment::FilteredValues(filter) => Some((EntryKind::Value, Some(filter))),
            Segment::Key(_) | Segment::Index(_) => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) if is_identifier(key) => write!(f, ".{}", key),
            Segment::Key(key) => write!(f, "[{:?}]", key),
            Segment::Index(index) => write!(f, "[{}]", index),
            Segment::AllKeys => f.write_str("[~]"),
            Segment::AllValues => f.write_str("[*]"),
            Segment::FilteredKeys(_) => f.write_str("[~?]"),
            Segment::FilteredValues(_) => f.write_str("[*?]"),
        }
    }
}

fn is_identifier(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with(|c: char| c.is_ascii_digit())
        && key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

impl From<&str> for Segment {
    fn from(value: &str) -> Self {
        Segment::Key(value.to_string())
    }
}

impl From<String> for Segment {
    fn from(value: String) -> Self {
        Segment::Key(value)
    }
}

impl From<usize> for Segment {
    fn from(value: usize) -> Self {
        Segment::Index(value)
    }
}
