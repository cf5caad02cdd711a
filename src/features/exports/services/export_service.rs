use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info};

use super::archive::build_export_archive;
use crate::core::error::{AppError, Result};
use crate::features::students::models::{StudentRecord, STUDENT_RECORD_SELECT};
use crate::modules::storage::ObjectStorage;
use crate::shared::constants::qr_code_key;

/// Fetch the stored QR image of each student; students without one are skipped
pub async fn collect_qr_images(
    storage: &dyn ObjectStorage,
    students: &[StudentRecord],
) -> Result<Vec<(String, Vec<u8>)>> {
    let mut images = Vec::new();

    for student in students {
        let key = qr_code_key(student.id);
        match storage.get(&key).await {
            Ok(bytes) => images.push((key, bytes)),
            Err(AppError::NotFound(_)) => {
                debug!("No QR image for student {}, skipping", student.id);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(images)
}

/// Builds the student data + QR image archive
pub struct ExportService {
    pool: PgPool,
    storage: Arc<dyn ObjectStorage>,
}

impl ExportService {
    pub fn new(pool: PgPool, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { pool, storage }
    }

    pub async fn export_archive(&self) -> Result<Vec<u8>> {
        let students: Vec<StudentRecord> =
            sqlx::query_as(&format!("{} ORDER BY s.id", STUDENT_RECORD_SELECT))
                .fetch_all(&self.pool)
                .await?;

        let images = collect_qr_images(self.storage.as_ref(), &students).await?;
        let archive = build_export_archive(&students, &images)?;

        info!(
            "Export built: {} students, {} QR images, {} bytes",
            students.len(),
            images.len(),
            archive.len()
        );
        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{memory_storage, student_record};

    #[tokio::test]
    async fn test_collect_skips_missing_images() {
        let storage = memory_storage();
        storage
            .put("qr_codes/student_2.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        let students = vec![student_record(1), student_record(2), student_record(3)];
        let images = collect_qr_images(storage.as_ref(), &students).await.unwrap();

        assert_eq!(images, vec![("qr_codes/student_2.png".to_string(), vec![1, 2, 3])]);
    }

    /// Storage whose existence check disagrees with its reads
    struct VanishingStorage;

    #[async_trait::async_trait]
    impl ObjectStorage for VanishingStorage {
        async fn put(&self, _key: &str, _data: Vec<u8>, _content_type: &str) -> Result<()> {
            Ok(())
        }

        async fn get(&self, key: &str) -> Result<Vec<u8>> {
            Err(AppError::NotFound(format!("File '{}' not found", key)))
        }

        async fn exists(&self, _key: &str) -> Result<bool> {
            Ok(true)
        }

        async fn delete(&self, _key: &str) -> Result<()> {
            Ok(())
        }

        fn public_url(&self, key: &str) -> String {
            format!("http://localhost:3000/media/{}", key)
        }

        fn backend_name(&self) -> &'static str {
            "vanishing"
        }
    }

    #[tokio::test]
    async fn test_collect_skips_image_removed_before_read() {
        let students = vec![student_record(1)];
        let images = collect_qr_images(&VanishingStorage, &students).await.unwrap();
        assert!(images.is_empty());
    }
}
