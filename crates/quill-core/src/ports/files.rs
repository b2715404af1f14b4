//! File store port - uploaded thumbnails and avatars.

use async_trait::async_trait;

/// Storage for uploaded images, addressed by generated filenames.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persist `bytes` under a fresh unique name derived from `original_name`
    /// and return that name.
    async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String, FileStoreError>;

    /// Remove a previously stored file.
    ///
    /// Returns [`FileStoreError::NotFound`] when the file is already gone so
    /// callers can decide whether that matters to them.
    async fn remove(&self, filename: &str) -> Result<(), FileStoreError>;
}

/// File store errors.
#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("File not found")]
    NotFound,

    #[error("Io error: {0}")]
    Io(String),
}
