//! Field bindings: where a field lives, how it decodes and what replaces a failure

use backed_decode::{DateStrategy, DecodeContext, Decoder};
use backed_path::{DecodingOptions, Limits, Path, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use tracing::debug;

/// An immutable description of how one record field is decoded
///
/// Without an explicit path ([`Field::at`]) the field is looked up under
/// its registered name. With a default value ([`Field::default_value`])
/// every decode failure is replaced by that value; otherwise the failure is
/// returned unchanged.
pub struct Field<T> {
    path: Option<Path>,
    default: Option<T>,
    options: DecodingOptions,
    decoder: Decoder<T>,
}

impl<T: DeserializeOwned + Send + 'static> Field<T> {
    /// Decode the field as a single value
    pub fn new() -> Self {
        Self::with_decoder(Decoder::value())
    }
}

impl<T: DeserializeOwned + Send + 'static> Default for Field<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned + Send + 'static> Field<Vec<T>> {
    /// Decode the field as an array (plain array or wildcard selection)
    pub fn array() -> Self {
        Self::with_decoder(Decoder::array())
    }
}

impl<T: DeserializeOwned + Eq + Hash + Send + 'static> Field<HashSet<T>> {
    /// Decode the field as a set
    pub fn set() -> Self {
        Self::with_decoder(Decoder::set())
    }
}

impl Field<DateTime<Utc>> {
    /// Decode the field as a date
    pub fn date(strategy: DateStrategy) -> Self {
        Self::with_decoder(Decoder::date(strategy))
    }
}

impl Field<Vec<DateTime<Utc>>> {
    /// Decode the field as a sequence of dates, one element at a time
    pub fn dates(strategy: DateStrategy) -> Self {
        Self::with_decoder(Decoder::dates(strategy))
    }
}

impl<T: Send + 'static> Field<T> {
    /// Decode the field with a custom decoder
    pub fn with_decoder(decoder: Decoder<T>) -> Self {
        Self {
            path: None,
            default: None,
            options: DecodingOptions::default(),
            decoder,
        }
    }

    /// Look the field up at `path` instead of under its name
    pub fn at(mut self, path: impl Into<Path>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Substitute `value` whenever decoding fails
    pub fn default_value(mut self, value: T) -> Self {
        self.default = Some(value);
        self
    }

    /// Drop collection elements that fail to decode
    pub fn lossy(mut self) -> Self {
        self.options = self.options.lossy();
        self
    }

    /// Replace the decoding options
    pub fn options(mut self, options: DecodingOptions) -> Self {
        self.options = options;
        self
    }

    /// Turn the field optional: decoded values become `Some`, and anything
    /// that fails yields `None`
    pub fn optional(self) -> Field<Option<T>> {
        Field {
            path: self.path,
            default: Some(None),
            options: self.options,
            decoder: self.decoder.optional(),
        }
    }

    /// The explicit path, if one was given
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// Whether a default value is configured
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The decoding options
    pub fn decoding_options(&self) -> DecodingOptions {
        self.options
    }

    /// The context this field decodes in when registered as `name`
    pub fn context(&self, name: &str, limits: Limits) -> DecodeContext {
        DecodeContext {
            given_path: self.path.clone(),
            inferred_path: Some(Path::root().key(name)),
            options: self.options,
            limits,
        }
    }
}

impl<T: Clone + Send + 'static> Field<T> {
    /// Decode the field registered as `name` out of `document`
    pub fn decode(&self, name: &str, document: &Value, limits: Limits) -> Result<T> {
        let context = self.context(name, limits);
        match self.decoder.decode(document, &context) {
            Ok(value) => Ok(value),
            Err(e) => match &self.default {
                Some(default) => {
                    debug!(field = name, path = %context.path(), error = %e, "using default value");
                    Ok(default.clone())
                }
                None => Err(e),
            },
        }
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("path", &self.path.as_ref().map(ToString::to_string))
            .field("has_default", &self.default.is_some())
            .field("options", &self.options)
            .finish()
    }
}
