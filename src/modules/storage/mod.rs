//! Storage module for uploaded and generated files
//!
//! Every backend implements [`ObjectStorage`]; the configured one is chosen at
//! startup by [`build_storage`].

mod local;
mod minio_client;

pub use local::LocalStorage;
pub use minio_client::MinIOStorage;

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::config::{StorageBackend, StorageConfig};
use crate::core::error::{AppError, Result};

/// Key/value file storage addressed by slash-separated keys (e.g. `qr_codes/student_1.png`)
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Write `data` under `key`, replacing any previous object
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()>;

    /// Read the object at `key`; `NotFound` if it does not exist
    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    async fn exists(&self, key: &str) -> Result<bool>;

    /// Remove the object; removing a missing key is not an error
    async fn delete(&self, key: &str) -> Result<()>;

    /// Fully-qualified URL the object is publicly reachable at
    fn public_url(&self, key: &str) -> String;

    fn backend_name(&self) -> &'static str;
}

/// Reject keys that could escape the storage root
pub(crate) fn validate_key(key: &str) -> Result<()> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|part| part.is_empty() || part == "." || part == "..");

    if bad {
        return Err(AppError::Storage(format!("Invalid storage key '{}'", key)));
    }
    Ok(())
}

/// Create the storage backend selected by configuration
pub async fn build_storage(config: &StorageConfig, base_url: &str) -> Result<Arc<dyn ObjectStorage>> {
    match config.backend {
        StorageBackend::Local => Ok(Arc::new(LocalStorage::new(
            config.media_root.clone(),
            format!("{}{}", base_url, config.media_url),
        ))),
        StorageBackend::MinIO => Ok(Arc::new(MinIOStorage::new(config.minio.clone()).await?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("qr_codes/student_1.png").is_ok());
        assert!(validate_key("uploads/csv/abc.csv").is_ok());

        assert!(validate_key("").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("qr_codes/../secret").is_err());
        assert!(validate_key("qr_codes//x.png").is_err());
        assert!(validate_key("qr_codes\\x.png").is_err());
    }
}
