//! Store error types.

use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A cache fingerprint that cannot name a file.
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let io = StoreError::Io(std::io::Error::other("disk busy"));
        assert_eq!(io.to_string(), "IO error: disk busy");
        assert_eq!(
            StoreError::InvalidKey("../x".to_string()).to_string(),
            "Invalid cache key: ../x"
        );
    }
}
