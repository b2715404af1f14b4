//! Local-filesystem file store for uploaded thumbnails and avatars.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use quill_core::ports::{FileStore, FileStoreError};

/// File store writing into a single upload directory.
///
/// The directory is created on construction; stored files are addressed by
/// the generated names this store hands back.
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    /// Open the store, creating the upload directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, FileStoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| FileStoreError::Io(e.to_string()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build a fresh name: original basename prefix, a random token, and the
    /// original extension. `photo.of.me.png` becomes `photo<uuid>.png`.
    fn unique_name(original: &str) -> String {
        // Anything resembling a path is reduced to its final component first.
        let base = Path::new(original)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file");

        let stem = match base.split('.').next() {
            Some(s) if !s.is_empty() => s,
            _ => "file",
        };
        let token = Uuid::new_v4();

        match base.rsplit('.').next().filter(|ext| *ext != stem && !ext.is_empty()) {
            Some(ext) => format!("{stem}{token}.{ext}"),
            None => format!("{stem}{token}"),
        }
    }

    fn resolve(&self, filename: &str) -> Result<PathBuf, FileStoreError> {
        // Refuse names that could escape the upload directory.
        let base = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(FileStoreError::NotFound)?;
        Ok(self.root.join(base))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String, FileStoreError> {
        let name = Self::unique_name(original_name);
        let path = self.root.join(&name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| FileStoreError::Io(e.to_string()))?;

        tracing::debug!(file = %name, size = bytes.len(), "Stored uploaded file");
        Ok(name)
    }

    async fn remove(&self, filename: &str) -> Result<(), FileStoreError> {
        let path = self.resolve(filename)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(FileStoreError::NotFound),
            Err(e) => Err(FileStoreError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_generates_unique_names_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path()).unwrap();

        let first = store.store("cat.png", b"first").await.unwrap();
        let second = store.store("cat.png", b"second").await.unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with("cat"));
        assert!(first.ends_with(".png"));
        assert_eq!(std::fs::read(dir.path().join(&first)).unwrap(), b"first");
        assert_eq!(std::fs::read(dir.path().join(&second)).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_multi_dot_names_keep_last_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path()).unwrap();

        let name = store.store("photo.of.me.jpeg", b"data").await.unwrap();

        assert!(name.starts_with("photo"));
        assert!(name.ends_with(".jpeg"));
    }

    #[tokio::test]
    async fn test_path_components_are_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path()).unwrap();

        let name = store.store("../../etc/passwd.png", b"data").await.unwrap();

        assert!(!name.contains('/'));
        assert!(dir.path().join(&name).exists());
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path()).unwrap();

        let result = store.remove("no-such-file.png").await;
        assert!(matches!(result, Err(FileStoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_store_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path()).unwrap();

        let name = store.store("cat.png", b"data").await.unwrap();
        store.remove(&name).await.unwrap();

        assert!(!dir.path().join(&name).exists());
    }
}
