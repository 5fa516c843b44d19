//! Backed Decode - Path resolution and typed decoding engine
//!
//! This crate walks an in-memory tree document along the routes of a
//! [`Path`] and decodes what it finds:
//!
//! - A minimal document capability trait, implemented for `serde_json::Value`
//! - Keyed, unkeyed and single-value container views
//! - Deferred entries and deterministically ordered entry sets
//! - The traversal context that opens one container per segment pair
//! - Typed decode operations (values, lossy arrays and sets, dates)
//! - Composable decoders

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod collection;
pub mod container;
pub mod context;
pub mod date;
pub mod decoder;
pub mod document;
pub mod entry;
pub mod located;
pub mod resolve;

// Re-export commonly used types
pub use backed_path::{
    BackedError, DecodingOptions, EntryKind, Limits, Path, PathFilter, PathKey, Result, Route,
    Segment,
};

// Re-export our own types
pub use container::{KeyedContainer, SingleValueContainer, UnkeyedCursor};
pub use context::{Element, TraversalContext};
pub use date::DateStrategy;
pub use decoder::{DecodeContext, Decoder};
pub use document::{Document, NodeKind};
pub use entry::{DeferredEntry, EntrySet};
pub use located::Located;
pub use resolve::Resolver;
