use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors surfaced by [`UrlStore`](crate::UrlStore) implementations.
///
/// Stores never retry; every variant is returned to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("short url already exists: {0}")]
    Conflict(String),
    #[error("short url not found: {0}")]
    NotFound(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("stored data is corrupt: {0}")]
    Corrupt(String),
    #[error("storage query failed: {0}")]
    Query(String),
}
