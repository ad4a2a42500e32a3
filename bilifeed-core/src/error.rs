//! Core error types for `bilifeed`.

use thiserror::Error;

/// Core error type for `bilifeed` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A time bound could not be parsed.
    #[error("Invalid time '{value}', expected format {expected}")]
    InvalidTime {
        /// The rejected input.
        value: String,
        /// The primary accepted format.
        expected: &'static str,
    },

    /// An enum-like option received an unknown value.
    #[error("Invalid value for {field}: {value}")]
    InvalidOption {
        /// Option name.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A translation file could not be read.
    #[error("Failed to read language file: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
