//! Backed Path - addressing primitives for path-driven decoding
//!
//! This crate describes *where* a value lives inside a semi-structured
//! document, independent of any document representation. It includes:
//!
//! - Route segments (keys, indices and key/value wildcards)
//! - Paths made of ordered OR-alternatives
//! - Typed entry filters
//! - Keyed-container keys with deterministic ordering
//! - Error types
//! - Resolution limits and decoding options

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod filter;
pub mod key;
pub mod limits;
pub mod path;
pub mod segment;

// Re-export commonly used types
pub use error::{BackedError, Result};
pub use filter::{FilterSubject, PathFilter};
pub use key::PathKey;
pub use limits::{DecodingOptions, Limits};
pub use path::{Path, Route};
pub use segment::{EntryKind, Segment};
