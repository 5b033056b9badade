use thiserror::Error;

/// Errors that can occur while talking to the blob store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store could not be configured from the supplied settings.
    #[error("storage configuration error: {0}")]
    Config(String),
    /// The object key is empty or would escape the bucket namespace.
    #[error("invalid object key: {0}")]
    InvalidKey(String),
    /// The backend rejected the request.
    #[error("storage backend error: {0}")]
    Backend(String),
}
