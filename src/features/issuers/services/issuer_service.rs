use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::issuers::dtos::{CreateIssuerDto, IssuerResponseDto, UpdateIssuerDto};
use crate::features::issuers::models::Issuer;
use crate::modules::storage::ObjectStorage;
use crate::shared::constants::{MAX_IMAGE_SIZE, SIGNATURE_PREFIX};
use crate::shared::upload::{validate_image, UploadedFile, IMAGE_EXTENSIONS};

const ISSUER_COLUMNS: &str = "id, name_en, uuid, signature_url, created_at, updated_at";

fn signature_key(id: i64, extension: &str) -> String {
    format!("{}/issuer_{}.{}", SIGNATURE_PREFIX, id, extension)
}

/// Service for issuer operations
pub struct IssuerService {
    pool: PgPool,
    storage: Arc<dyn ObjectStorage>,
    base_url: String,
}

impl IssuerService {
    pub fn new(pool: PgPool, storage: Arc<dyn ObjectStorage>, base_url: String) -> Self {
        Self {
            pool,
            storage,
            base_url,
        }
    }

    fn to_dto(&self, issuer: Issuer) -> IssuerResponseDto {
        IssuerResponseDto::from_model(issuer, &self.base_url)
    }

    /// Create an issuer with a freshly generated public UUID
    pub async fn create(&self, dto: CreateIssuerDto) -> Result<IssuerResponseDto> {
        let issuer: Issuer = sqlx::query_as(&format!(
            "INSERT INTO issuers (name_en, uuid) VALUES ($1, $2) RETURNING {}",
            ISSUER_COLUMNS
        ))
        .bind(&dto.name_en)
        .bind(Uuid::new_v4())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| handle_db_error(e, "An issuer with this identifier already exists."))?;

        info!("Issuer created: id={}, name={}", issuer.id, issuer.name_en);
        Ok(self.to_dto(issuer))
    }

    /// List all issuers ordered by name
    pub async fn list(&self) -> Result<Vec<IssuerResponseDto>> {
        let issuers: Vec<Issuer> = sqlx::query_as(&format!(
            "SELECT {} FROM issuers ORDER BY name_en, id",
            ISSUER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list issuers: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(issuers.into_iter().map(|i| self.to_dto(i)).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Issuer> {
        sqlx::query_as(&format!("SELECT {} FROM issuers WHERE id = $1", ISSUER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Issuer with id {} not found", id)))
    }

    pub async fn find_by_uuid(&self, uuid: Uuid) -> Result<Issuer> {
        sqlx::query_as(&format!(
            "SELECT {} FROM issuers WHERE uuid = $1",
            ISSUER_COLUMNS
        ))
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Issuer {} not found", uuid)))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<IssuerResponseDto> {
        let issuer = self.find_by_id(id).await?;
        Ok(self.to_dto(issuer))
    }

    /// Update the issuer name; the UUID is never changed
    pub async fn update(&self, id: i64, dto: UpdateIssuerDto) -> Result<IssuerResponseDto> {
        let issuer: Issuer = sqlx::query_as(&format!(
            r#"
            UPDATE issuers
            SET name_en = COALESCE($1, name_en),
                updated_at = NOW()
            WHERE id = $2
            RETURNING {}
            "#,
            ISSUER_COLUMNS
        ))
        .bind(&dto.name_en)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Issuer with id {} not found", id)))?;

        info!("Issuer updated: id={}", issuer.id);
        Ok(self.to_dto(issuer))
    }

    /// Delete an issuer and its stored signature; its students are removed by
    /// the cascading foreign key
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM issuers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Issuer with id {} not found", id)));
        }

        for extension in IMAGE_EXTENSIONS {
            let key = signature_key(id, extension);
            if let Err(e) = self.storage.delete(&key).await {
                warn!("Failed to remove signature '{}': {}", key, e);
            }
        }

        info!("Issuer deleted: id={}", id);
        Ok(())
    }

    /// Store a signature image and record its public URL on the issuer
    pub async fn upload_signature(&self, id: i64, file: UploadedFile) -> Result<IssuerResponseDto> {
        let extension = validate_image(&file, MAX_IMAGE_SIZE)?;
        // 404 before anything is written
        self.find_by_id(id).await?;

        let key = signature_key(id, extension);
        self.storage.put(&key, file.data, &file.content_type).await?;
        let url = self.storage.public_url(&key);

        let issuer: Issuer = sqlx::query_as(&format!(
            "UPDATE issuers SET signature_url = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
            ISSUER_COLUMNS
        ))
        .bind(&url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Issuer with id {} not found", id)))?;

        info!("Signature stored for issuer {}: {}", id, key);
        Ok(self.to_dto(issuer))
    }
}
