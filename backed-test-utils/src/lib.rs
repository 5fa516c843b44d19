//! Backed Test Utilities
//!
//! This crate provides shared fixtures and helpers for the backed crates'
//! tests and benches.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

/// The reference document most engine and record tests decode
pub const STUB_JSON: &str = r#"{
    "name": "Steve",
    "dates": [1613984296, "N/A", 1613984996],
    "values": [12, "34", 56, "78"],
    "attributes": {
        "values": ["12", 34, "56", 78],
        "all dates": {
            "start_date": 1613984296000,
            "end_date": 1613984996
        }
    },
    "counts": {
        "apples": 12,
        "oranges": 9,
        "bananas": 6
    },
    "foreground_color": {
        "hue": 255,
        "saturation": 128,
        "brightness": 128
    },
    "background_color": {
        "red": 255,
        "green": 128,
        "blue": 128
    },
    "birthdays": {
        "Steve Jobs": -468691200,
        "Tim Cook": -289238400
    }
}"#;

/// [`STUB_JSON`] parsed into a JSON tree
pub fn stub_document() -> Value {
    serde_json::from_str(STUB_JSON).expect("stub document is valid JSON")
}

/// UTC timestamp from calendar fields
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
        .expect("valid calendar date")
}

/// UTC timestamp from whole seconds since the Unix epoch
pub fn epoch_seconds(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .expect("timestamp in range")
}

/// Builder for creating test documents with common patterns
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    fields: Map<String, Value>,
}

impl DocumentBuilder {
    /// Create an empty document builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field with a string value
    pub fn string(mut self, key: &str, value: &str) -> Self {
        self.fields
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Add a field with an integer value
    pub fn int(mut self, key: &str, value: i64) -> Self {
        self.fields.insert(key.to_string(), Value::from(value));
        self
    }

    /// Add a field with a floating point value
    pub fn float(mut self, key: &str, value: f64) -> Self {
        self.fields.insert(key.to_string(), Value::from(value));
        self
    }

    /// Add a field with a boolean value
    pub fn bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), Value::Bool(value));
        self
    }

    /// Add a field with a null value
    pub fn null(mut self, key: &str) -> Self {
        self.fields.insert(key.to_string(), Value::Null);
        self
    }

    /// Add a field holding a nested document
    pub fn object(mut self, key: &str, value: DocumentBuilder) -> Self {
        self.fields.insert(key.to_string(), value.build());
        self
    }

    /// Add a field with an array value
    pub fn array(mut self, key: &str, value: Vec<Value>) -> Self {
        self.fields.insert(key.to_string(), Value::Array(value));
        self
    }

    /// Build the document
    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Generate documents with shapes that stress path resolution
pub struct TestDataGenerator;

impl TestDataGenerator {
    /// A keyed container whose keys mix canonical integers and strings
    pub fn mixed_key_document() -> Value {
        DocumentBuilder::new()
            .int("10", 10)
            .int("2", 2)
            .int("-1", -1)
            .int("007", 7)
            .int("oranges", 9)
            .int("apples", 12)
            .build()
    }

    /// An object nested `depth` levels deep under `"level"` keys, ending in `leaf`
    pub fn nested_document(depth: usize, leaf: Value) -> Value {
        (0..depth).fold(leaf, |inner, _| {
            let mut map = Map::new();
            map.insert("level".to_string(), inner);
            Value::Object(map)
        })
    }

    /// A keyed container with `count` integer-valued entries `key_0000..`
    pub fn wide_document(count: usize) -> Value {
        let fields = (0..count)
            .map(|i| (format!("key_{:04}", i), Value::from(i as i64)))
            .collect();
        Value::Object(fields)
    }

    /// An array alternating decodable numbers and undecodable strings
    pub fn mixed_array(count: usize) -> Value {
        Value::Array(
            (0..count)
                .map(|i| {
                    if i % 2 == 0 {
                        Value::from(i as i64)
                    } else {
                        Value::String(format!("n/a {}", i))
                    }
                })
                .collect(),
        )
    }
}
