//! Resolution limits and decoding options

use crate::error::{BackedError, Result};

/// Limits applied while resolving paths against a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of segments in one route (default: 32, hard: 256)
    pub max_route_depth: usize,
    /// Maximum number of OR-alternatives tried for one path (default: 16, hard: 256)
    pub max_alternatives: usize,
    /// Maximum entries materialised from one keyed container (default: 65,536, hard: 16 Mi)
    pub max_entry_set_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_route_depth: 32,
            max_alternatives: 16,
            max_entry_set_len: 65_536,
        }
    }
}

impl Limits {
    /// Hard maximum limits that cannot be exceeded
    pub fn hard_maximums() -> Self {
        Self {
            max_route_depth: 256,
            max_alternatives: 256,
            max_entry_set_len: 16 * 1024 * 1024,
        }
    }

    /// Validate limits against hard maximums
    pub fn validate(&self) -> Result<()> {
        let hard = Self::hard_maximums();

        if self.max_route_depth > hard.max_route_depth {
            return Err(BackedError::LimitExceeded(format!(
                "max_route_depth {} exceeds hard limit {}",
                self.max_route_depth, hard.max_route_depth
            )));
        }

        if self.max_alternatives > hard.max_alternatives {
            return Err(BackedError::LimitExceeded(format!(
                "max_alternatives {} exceeds hard limit {}",
                self.max_alternatives, hard.max_alternatives
            )));
        }

        if self.max_entry_set_len > hard.max_entry_set_len {
            return Err(BackedError::LimitExceeded(format!(
                "max_entry_set_len {} exceeds hard limit {}",
                self.max_entry_set_len, hard.max_entry_set_len
            )));
        }

        Ok(())
    }
}

/// Independent flags controlling how a value is decoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DecodingOptions {
    /// Skip collection elements that fail to decode instead of failing the collection
    pub lossy: bool,
}

impl DecodingOptions {
    /// Strict decoding: every collection element must decode
    pub const STRICT: DecodingOptions = DecodingOptions { lossy: false };

    /// Lossy decoding: undecodable collection elements are dropped
    pub const LOSSY: DecodingOptions = DecodingOptions { lossy: true };

    /// Return a copy with lossy decoding enabled
    pub fn lossy(mut self) -> Self {
        self.lossy = true;
        self
    }

    /// Whether lossy decoding is enabled
    pub fn is_lossy(&self) -> bool {
        self.lossy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_are_valid() {
        assert!(Limits::default().validate().is_ok());
        assert!(Limits::hard_maximums().validate().is_ok());
    }

    #[test]
    fn validate_rejects_values_above_hard_maximums() {
        let limits = Limits {
            max_route_depth: 1_000,
            ..Limits::default()
        };
        let err = limits.validate().unwrap_err();
        assert!(matches!(err, BackedError::LimitExceeded(msg) if msg.contains("max_route_depth")));

        let limits = Limits {
            max_alternatives: 257,
            ..Limits::default()
        };
        assert!(limits.validate().is_err());

        let limits = Limits {
            max_entry_set_len: usize::MAX,
            ..Limits::default()
        };
        assert!(limits.validate().is_err());
    }

    #[test]
    fn decoding_options_flags() {
        assert!(!DecodingOptions::default().is_lossy());
        assert_eq!(DecodingOptions::default(), DecodingOptions::STRICT);
        assert!(DecodingOptions::LOSSY.is_lossy());
        assert!(DecodingOptions::STRICT.lossy().is_lossy());
    }
}
