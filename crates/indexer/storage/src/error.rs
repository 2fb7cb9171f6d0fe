use thiserror::Error;

/// Errors that may occur while interacting with a [`crate::KeyValueStore`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The store has been closed and can no longer be used.
    #[error("store unavailable")]
    Unavailable,

    /// The requested key is not present in the store.
    #[error("key not found: {0}")]
    NotFound(String),
}

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
