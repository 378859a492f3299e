use async_trait::async_trait;

/// Durable string key-value storage on the client side.
#[async_trait]
pub trait LocalStorage: Send + Sync {
    /// Get the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Local storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Read failed: {0}")]
    Read(String),

    #[error("Write failed: {0}")]
    Write(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

impl From<StorageError> for crate::error::RepoError {
    fn from(err: StorageError) -> Self {
        crate::error::RepoError::LocalStore(err.to_string())
    }
}
