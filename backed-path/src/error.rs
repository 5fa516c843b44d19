//! Error types shared by every backed crate

use thiserror::Error;

/// Backed error types
#[derive(Debug, Error)]
pub enum BackedError {
    /// The route cannot be resolved against the document's actual shape.
    #[error("Invalid path {path}: {reason}")]
    InvalidPath {
        /// Display form of the route or path that failed
        path: String,
        /// Why the route could not be followed
        reason: String,
    },
    /// A value was structurally present but semantically absent.
    #[error("Missing value: {reason}")]
    MissingValue {
        /// What could not be produced from the located value
        reason: String,
    },
    /// A keyed container has no entry for the requested key.
    #[error("Key not found: \"{key}\"")]
    KeyNotFound {
        /// The key that was requested
        key: String,
    },
    /// An ordered container ended before the requested position.
    #[error("Index {index} out of bounds (length {len})")]
    IndexOutOfBounds {
        /// Requested position
        index: usize,
        /// Number of elements actually available
        len: usize,
    },
    /// A container of one kind was required but another was found.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Expected node kind
        expected: &'static str,
        /// Actual node kind
        found: &'static str,
    },
    /// A keyed-container key could not be decoded at the requested type.
    #[error("Cannot decode key \"{key}\": {reason}")]
    KeyDecode {
        /// The key's string representation
        key: String,
        /// Decoder message
        reason: String,
    },
    /// A configured limit was exceeded.
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
    /// Decode error reported by the underlying JSON layer.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// I/O operation failed while reading a document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Error raised by a user-supplied decoder.
    #[error("{0}")]
    Custom(String),
}

impl BackedError {
    /// Build an [`BackedError::InvalidPath`] for the given path display
    pub fn invalid_path(path: impl ToString, reason: impl Into<String>) -> Self {
        BackedError::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Build a [`BackedError::MissingValue`]
    pub fn missing_value(reason: impl Into<String>) -> Self {
        BackedError::MissingValue {
            reason: reason.into(),
        }
    }

    /// Build a [`BackedError::Custom`] error, for use inside custom decoders
    pub fn custom(message: impl Into<String>) -> Self {
        BackedError::Custom(message.into())
    }

    /// Whether this error says the path did not match the document's shape
    /// (as opposed to a value that was found but could not be decoded).
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            BackedError::InvalidPath { .. }
                | BackedError::KeyNotFound { .. }
                | BackedError::IndexOutOfBounds { .. }
                | BackedError::TypeMismatch { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, BackedError>;
