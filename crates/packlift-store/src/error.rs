//! Error types for storage operations

use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    // ============ Remote/Provider Errors ============
    #[error("Invalid remote, scheme not supported: {scheme}")]
    UnsupportedProvider { scheme: String },

    #[error("Invalid remote URI: {uri} - {reason}")]
    InvalidRemote { uri: String, reason: String },

    #[error("Credential required: {key}")]
    MissingCredential { key: String },

    // ============ Transfer Errors ============
    #[error("Transfer failed for {object}: {message}")]
    Transfer { object: String, message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Integrity check failed for {file}: expected {expected}, got {actual}")]
    IntegrityCheckFailed {
        file: String,
        expected: String,
        actual: String,
    },

    // ============ Cache Errors ============
    #[error("Cache directory error: {message}")]
    CacheDir { message: String },

    // ============ Passthrough ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] packlift_core::CoreError),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Transfer failure for a named object
    pub fn transfer(object: impl Into<String>, message: impl std::fmt::Display) -> Self {
        StoreError::Transfer {
            object: object.into(),
            message: message.to_string(),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            StoreError::Network {
                message: format!("Connection failed: {}", e),
            }
        } else {
            StoreError::Network {
                message: e.to_string(),
            }
        }
    }
}
