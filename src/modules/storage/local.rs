//! Filesystem storage rooted at the media directory

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use super::{validate_key, ObjectStorage};
use crate::core::error::{AppError, Result};

pub struct LocalStorage {
    root: PathBuf,
    /// `<base-url><media-url>`, e.g. `http://localhost:3000/media/`
    public_base: String,
}

impl LocalStorage {
    pub fn new(root: PathBuf, public_base: String) -> Self {
        Self { root, public_base }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!("Failed to create directory for '{}': {}", key, e))
            })?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write '{}': {}", key, e)))?;

        debug!("Stored file '{}' at {}", key, path.display());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("File '{}' not found", key)))
            }
            Err(e) => Err(AppError::Storage(format!("Failed to read '{}': {}", key, e))),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to check '{}': {}", key, e)))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted file '{}'", key);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("Failed to delete '{}': {}", key, e))),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}{}", self.public_base, key)
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &tempfile::TempDir) -> LocalStorage {
        LocalStorage::new(
            dir.path().to_path_buf(),
            "http://localhost:3000/media/".to_string(),
        )
    }

    #[tokio::test]
    async fn test_put_get_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        storage
            .put("qr_codes/student_1.png", b"first".to_vec(), "image/png")
            .await
            .unwrap();
        storage
            .put("qr_codes/student_1.png", b"second".to_vec(), "image/png")
            .await
            .unwrap();

        assert_eq!(
            storage.get("qr_codes/student_1.png").await.unwrap(),
            b"second"
        );
        assert!(dir.path().join("qr_codes/student_1.png").exists());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        assert!(!storage.exists("qr_codes/student_9.png").await.unwrap());
        let err = storage.get("qr_codes/student_9.png").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        storage.delete("qr_codes/student_9.png").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let err = storage
            .put("../outside.txt", b"x".to_vec(), "text/plain")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[test]
    fn test_public_url() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            storage(&dir).public_url("qr_codes/student_3.png"),
            "http://localhost:3000/media/qr_codes/student_3.png"
        );
    }
}
