use image::DynamicImage;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};

use super::link_store::{PgQrLinkStore, QrLinkStore};
use super::qr_renderer::{load_logo, render_qr_png};
use crate::core::config::QrConfig;
use crate::core::error::{AppError, Result};
use crate::features::qr_codes::dtos::{QrBatchReportDto, QrScope, StudentQrDto};
use crate::modules::storage::ObjectStorage;
use crate::shared::constants::qr_code_key;
use crate::shared::urls::student_qr_info_url;

fn student_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Student with id {} not found", id))
}

/// Generates verification QR codes and records their public URL on the student
pub struct QrCodeService {
    links: Arc<dyn QrLinkStore>,
    storage: Arc<dyn ObjectStorage>,
    config: QrConfig,
    base_url: String,
}

impl QrCodeService {
    pub fn new(
        pool: PgPool,
        storage: Arc<dyn ObjectStorage>,
        config: QrConfig,
        base_url: String,
    ) -> Self {
        Self::with_store(Arc::new(PgQrLinkStore::new(pool)), storage, config, base_url)
    }

    pub fn with_store(
        links: Arc<dyn QrLinkStore>,
        storage: Arc<dyn ObjectStorage>,
        config: QrConfig,
        base_url: String,
    ) -> Self {
        Self {
            links,
            storage,
            config,
            base_url,
        }
    }

    async fn logo(&self) -> Result<Option<DynamicImage>> {
        match &self.config.logo_path {
            Some(path) => Ok(Some(load_logo(path).await?)),
            None => Ok(None),
        }
    }

    /// Render, store and link the QR code of one student.
    ///
    /// The image is overwritten on every call; the link column is only
    /// written after the image is stored.
    async fn generate_for(&self, id: i64, logo: Option<&DynamicImage>) -> Result<StudentQrDto> {
        let verification_url = student_qr_info_url(&self.base_url, id);
        let png = render_qr_png(&verification_url, &self.config, logo)?;

        let key = qr_code_key(id);
        self.storage.put(&key, png, "image/png").await?;
        let qr_code_link = self.storage.public_url(&key);

        if !self.links.set_link(id, &qr_code_link).await? {
            return Err(student_not_found(id));
        }

        Ok(StudentQrDto {
            id,
            verification_url,
            qr_code_link,
        })
    }

    /// Generate QR codes for every student in `scope`.
    ///
    /// Students are processed one by one; a failure is recorded and the run
    /// continues, leaving earlier students updated.
    pub async fn generate_batch(&self, scope: QrScope) -> Result<QrBatchReportDto> {
        let logo = self.logo().await?;
        let ids = self.links.student_ids(scope).await?;

        let mut report = QrBatchReportDto {
            scope,
            generated: 0,
            failed: 0,
            errors: Vec::new(),
        };

        for id in ids {
            match self.generate_for(id, logo.as_ref()).await {
                Ok(_) => report.generated += 1,
                Err(e) => {
                    warn!("QR generation failed for student {}: {}", id, e);
                    report.failed += 1;
                    report.errors.push(format!("Student {}: {}", id, e));
                }
            }
        }

        info!(
            "QR batch ({:?}) finished: {} generated, {} failed",
            scope, report.generated, report.failed
        );
        Ok(report)
    }

    /// Regenerate the QR code of a single student
    pub async fn generate_one(&self, id: i64) -> Result<StudentQrDto> {
        if !self.links.student_exists(id).await? {
            return Err(student_not_found(id));
        }

        let logo = self.logo().await?;
        let dto = self.generate_for(id, logo.as_ref()).await?;
        info!("QR code generated for student {}", id);
        Ok(dto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::MemoryStorage;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    const BASE_URL: &str = "https://certs.example.org";

    /// Student id to stored link
    struct MemoryQrLinks {
        links: Mutex<BTreeMap<i64, Option<String>>>,
    }

    impl MemoryQrLinks {
        fn new(students: &[(i64, Option<&str>)]) -> Arc<Self> {
            let links = students
                .iter()
                .map(|(id, link)| (*id, link.map(str::to_string)))
                .collect();
            Arc::new(Self {
                links: Mutex::new(links),
            })
        }

        fn link(&self, id: i64) -> Option<String> {
            self.links.lock().unwrap().get(&id).cloned().flatten()
        }
    }

    #[async_trait]
    impl QrLinkStore for MemoryQrLinks {
        async fn student_ids(&self, scope: QrScope) -> Result<Vec<i64>> {
            let links = self.links.lock().unwrap();
            Ok(links
                .iter()
                .filter(|(_, link)| {
                    scope == QrScope::All || link.as_deref().unwrap_or("").is_empty()
                })
                .map(|(id, _)| *id)
                .collect())
        }

        async fn student_exists(&self, id: i64) -> Result<bool> {
            Ok(self.links.lock().unwrap().contains_key(&id))
        }

        async fn set_link(&self, id: i64, qr_code_link: &str) -> Result<bool> {
            match self.links.lock().unwrap().get_mut(&id) {
                Some(link) => {
                    *link = Some(qr_code_link.to_string());
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    fn service(links: Arc<MemoryQrLinks>, storage: Arc<MemoryStorage>) -> QrCodeService {
        let config = QrConfig {
            box_size: 2,
            border: 1,
            ..QrConfig::default()
        };
        QrCodeService::with_store(links, storage, config, BASE_URL.to_string())
    }

    #[tokio::test]
    async fn test_regeneration_overwrites_image_at_same_key() {
        let links = MemoryQrLinks::new(&[(7, None)]);
        let storage = Arc::new(MemoryStorage::default());
        let key = qr_code_key(7);
        storage.put(&key, b"stale".to_vec(), "image/png").await.unwrap();
        let service = service(links.clone(), storage.clone());

        let first = service.generate_one(7).await.unwrap();
        let first_png = storage.get(&key).await.unwrap();
        assert_ne!(first_png, b"stale".to_vec());
        assert!(first_png.starts_with(b"\x89PNG"));

        assert_eq!(
            first.verification_url,
            "https://certs.example.org/certificate/student-qr-info/7/"
        );
        assert_eq!(first.qr_code_link, storage.public_url(&key));
        assert_eq!(links.link(7).as_deref(), Some(first.qr_code_link.as_str()));

        let second = service.generate_one(7).await.unwrap();
        assert_eq!(second.verification_url, first.verification_url);
        assert_eq!(second.qr_code_link, first.qr_code_link);
        assert_eq!(storage.get(&key).await.unwrap(), first_png);
    }

    #[tokio::test]
    async fn test_missing_scope_skips_linked_students() {
        let links = MemoryQrLinks::new(&[
            (1, Some("http://localhost:3000/media/qr_codes/student_1.png")),
            (2, None),
            (3, Some("")),
        ]);
        let storage = Arc::new(MemoryStorage::default());
        let service = service(links.clone(), storage.clone());

        let report = service.generate_batch(QrScope::Missing).await.unwrap();
        assert_eq!(report.generated, 2);
        assert_eq!(report.failed, 0);
        assert!(!storage.exists(&qr_code_key(1)).await.unwrap());
        assert!(storage.exists(&qr_code_key(2)).await.unwrap());
        assert!(storage.exists(&qr_code_key(3)).await.unwrap());
        assert_eq!(links.link(3), Some(storage.public_url(&qr_code_key(3))));

        let report = service.generate_batch(QrScope::All).await.unwrap();
        assert_eq!(report.generated, 3);
        assert!(storage.exists(&qr_code_key(1)).await.unwrap());
    }

    #[tokio::test]
    async fn test_generate_one_unknown_student() {
        let storage = Arc::new(MemoryStorage::default());
        let service = service(MemoryQrLinks::new(&[]), storage.clone());

        let err = service.generate_one(99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(!storage.exists(&qr_code_key(99)).await.unwrap());
    }
}
