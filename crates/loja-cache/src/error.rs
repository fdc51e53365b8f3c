//! Cache error types.

use thiserror::Error;

/// Errors raised by a key-value storage backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Failed to perform store operation.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// Stored bytes are not valid UTF-8.
    #[error("Stored value for {0} is not valid UTF-8")]
    InvalidUtf8(String),

    /// The backend refused the write because it is full.
    #[error("Store quota exceeded while writing {key} ({bytes} bytes)")]
    QuotaExceeded { key: String, bytes: usize },
}
