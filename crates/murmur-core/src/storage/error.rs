//! Storage error types.
//!
//! - `InvalidKey`: key cannot be mapped onto the backing store
//! - `Serialization`: a value failed to encode or decode as JSON
//! - `Io`: underlying storage system errors (including injected failures)

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Key contains characters the backing store cannot represent
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Serialization or deserialization failed
    #[error("serialization error for {key}: {reason}")]
    Serialization {
        /// Key whose value failed to (de)serialize
        key: String,
        /// Underlying serde error
        reason: String,
    },

    /// I/O error (file system, injected fault, etc.)
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}
