//! Backed Record - Declarative, path-addressed decoding of whole records
//!
//! This crate binds record fields to paths and runs them against a JSON
//! document in one pass:
//!
//! - Field bindings with explicit paths, defaults and decoding options
//! - Explicit registration of a record's fields ([`RecordSchema`])
//! - An immutable set of decoded values ([`DecodedFields`])
//! - High-level entry points for values, strings, byte slices and readers
//!
//! ```
//! use backed_record::{BackedDecodable, DecodedFields, Field, Path, RecordSchema, Result};
//!
//! struct User {
//!     name: String,
//!     tags: Vec<String>,
//! }
//!
//! impl BackedDecodable for User {
//!     fn schema() -> RecordSchema {
//!         RecordSchema::new()
//!             .field("name", Field::<String>::new().at(Path::from("full_name").or_else("name")))
//!             .field("tags", Field::<Vec<String>>::array().lossy().default_value(vec![]))
//!     }
//!
//!     fn from_fields(mut fields: DecodedFields) -> Result<Self> {
//!         Ok(User {
//!             name: fields.take("name"),
//!             tags: fields.take("tags"),
//!         })
//!     }
//! }
//!
//! let user: User = backed_record::from_str(r#"{"name": "Ada", "tags": ["a", 1, "b"]}"#).unwrap();
//! assert_eq!(user.name, "Ada");
//! assert_eq!(user.tags, vec!["a", "b"]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod field;
pub mod fields;
pub mod schema;

// Re-export commonly used types
pub use backed_decode::{DateStrategy, DecodeContext, Decoder, Resolver};
pub use backed_path::{BackedError, DecodingOptions, Limits, Path, PathFilter, Result, Segment};
pub use field::Field;
pub use fields::DecodedFields;
pub use schema::RecordSchema;

use serde_json::Value;
use std::io::{BufReader, Read};

/// A record decoded field by field from registered bindings
pub trait BackedDecodable: Sized {
    /// The record's fields, in decode order
    fn schema() -> RecordSchema;

    /// Build the record from the values of one decode pass
    fn from_fields(fields: DecodedFields) -> Result<Self>;
}

/// Decode every field of `schema` out of `document`
///
/// Fails with the first field error that no default absorbed.
pub fn decode_record_with(document: &Value, schema: &RecordSchema, limits: Limits) -> Result<DecodedFields> {
    limits.validate()?;
    schema.decode(document, limits)
}

/// Decode a record from a JSON tree with default limits
pub fn decode_record<R: BackedDecodable>(document: &Value) -> Result<R> {
    from_value_with_limits(document, Limits::default())
}

/// Decode a record from a JSON tree with custom limits
pub fn from_value_with_limits<R: BackedDecodable>(document: &Value, limits: Limits) -> Result<R> {
    let fields = decode_record_with(document, &R::schema(), limits)?;
    R::from_fields(fields)
}

/// Decode a record from a JSON tree
pub fn from_value<R: BackedDecodable>(document: &Value) -> Result<R> {
    decode_record(document)
}

/// Parse JSON text and decode a record from it
pub fn from_str<R: BackedDecodable>(json: &str) -> Result<R> {
    let document: Value = serde_json::from_str(json)?;
    decode_record(&document)
}

/// Parse JSON bytes and decode a record from them
pub fn from_slice<R: BackedDecodable>(json: &[u8]) -> Result<R> {
    let document: Value = serde_json::from_slice(json)?;
    decode_record(&document)
}

/// Read JSON from `reader` and decode a record from it
pub fn from_reader<R: BackedDecodable, I: Read>(reader: I) -> Result<R> {
    let document: Value = serde_json::from_reader(BufReader::new(reader))?;
    decode_record(&document)
}
