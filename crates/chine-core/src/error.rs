//! Core error types for the chine scraper.
//!
//! This module defines the central error type used across all subsystems.
//! Each subsystem error is represented as a variant for clear error propagation.

use thiserror::Error;

/// Central error type for all chine operations.
///
/// Each variant represents an error from a specific subsystem, allowing
/// for clear error propagation and handling across crate boundaries.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration errors (file loading, parsing, validation)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Search model errors (invalid request, locations, filters)
    #[error("search error: {0}")]
    Search(String),

    /// Page fetch errors (network, rate limiting, upstream rejection)
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Scrape run errors (aborted runs, sink failures)
    #[error("scrape error: {0}")]
    Scrape(String),

    /// Validation errors (invalid input, constraints)
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Config file not found (may be first run)
    #[error("config file not found at {path}")]
    NotFound {
        /// Path where config was expected
        path: String,
    },

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::Validation("bad listing id".to_string());
        assert_eq!(err.to_string(), "validation error: bad listing id");
    }

    #[test]
    fn test_config_error_conversion() {
        let config_err = ConfigError::NoConfigDir;
        let core_err: CoreError = config_err.into();
        assert!(core_err.to_string().contains("config directory"));
    }

    #[test]
    fn test_invalid_value_display() {
        let err = ConfigError::InvalidValue {
            field: "limit_per_page".to_string(),
            reason: "must be 1-35".to_string(),
        };
        assert!(err.to_string().contains("limit_per_page"));
        assert!(err.to_string().contains("must be 1-35"));
    }
}
