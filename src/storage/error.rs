//! Storage error types
//!
//! Defines all errors that can occur in the storage layer.

use thiserror::Error;

/// Errors that can occur in the storage layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed (creating the data directory)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite rejected a statement or the connection failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization of stored JSON failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An application with this name already exists
    #[error("Application name '{0}' is already registered")]
    AppNameTaken(String),

    /// Requested application does not exist
    #[error("Application not found: {0}")]
    AppNotFound(i64),

    /// Stored row could not be decoded
    #[error("Corrupt row: {0}")]
    Corruption(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
