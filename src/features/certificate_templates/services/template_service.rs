use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::certificate_templates::dtos::{
    CreateTemplateDto, TemplateResponseDto, UpdateTemplateDto,
};
use crate::features::certificate_templates::models::CertificateTemplate;
use crate::modules::storage::ObjectStorage;
use crate::shared::constants::{MAX_IMAGE_SIZE, TEMPLATE_BACKGROUND_PREFIX};
use crate::shared::types::PaginationQuery;
use crate::shared::upload::{validate_image, UploadedFile, IMAGE_EXTENSIONS};

const TEMPLATE_COLUMNS: &str = "id, name, background_image_url, font, title_font_size, \
     body_font_size, text_color, qr_code_position, created_at, updated_at";

fn background_key(id: i64, extension: &str) -> String {
    format!("{}/template_{}.{}", TEMPLATE_BACKGROUND_PREFIX, id, extension)
}

/// Service for certificate template operations
pub struct TemplateService {
    pool: PgPool,
    storage: Arc<dyn ObjectStorage>,
}

impl TemplateService {
    pub fn new(pool: PgPool, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { pool, storage }
    }

    fn not_found(id: i64) -> AppError {
        AppError::NotFound(format!("Certificate template with id {} not found", id))
    }

    pub async fn create(&self, dto: CreateTemplateDto) -> Result<TemplateResponseDto> {
        let template: CertificateTemplate = sqlx::query_as(&format!(
            r#"
            INSERT INTO certificate_templates
                (name, font, title_font_size, body_font_size, text_color, qr_code_position)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            TEMPLATE_COLUMNS
        ))
        .bind(&dto.name)
        .bind(&dto.font)
        .bind(dto.title_font_size)
        .bind(dto.body_font_size)
        .bind(&dto.text_color)
        .bind(dto.qr_code_position)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| handle_db_error(e, "A template with these details already exists."))?;

        info!("Certificate template created: id={}, name={}", template.id, template.name);
        Ok(template.into())
    }

    pub async fn list(&self, query: &PaginationQuery) -> Result<(Vec<TemplateResponseDto>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM certificate_templates")
            .fetch_one(&self.pool)
            .await?;

        let templates: Vec<CertificateTemplate> = sqlx::query_as(&format!(
            "SELECT {} FROM certificate_templates ORDER BY name, id LIMIT $1 OFFSET $2",
            TEMPLATE_COLUMNS
        ))
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((templates.into_iter().map(Into::into).collect(), total))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<TemplateResponseDto> {
        let template: CertificateTemplate = sqlx::query_as(&format!(
            "SELECT {} FROM certificate_templates WHERE id = $1",
            TEMPLATE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Self::not_found(id))?;

        Ok(template.into())
    }

    pub async fn update(&self, id: i64, dto: UpdateTemplateDto) -> Result<TemplateResponseDto> {
        let template: CertificateTemplate = sqlx::query_as(&format!(
            r#"
            UPDATE certificate_templates
            SET name = COALESCE($1, name),
                font = COALESCE($2, font),
                title_font_size = COALESCE($3, title_font_size),
                body_font_size = COALESCE($4, body_font_size),
                text_color = COALESCE($5, text_color),
                qr_code_position = COALESCE($6, qr_code_position),
                updated_at = NOW()
            WHERE id = $7
            RETURNING {}
            "#,
            TEMPLATE_COLUMNS
        ))
        .bind(&dto.name)
        .bind(&dto.font)
        .bind(dto.title_font_size)
        .bind(dto.body_font_size)
        .bind(dto.text_color)
        .bind(dto.qr_code_position)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Self::not_found(id))?;

        info!("Certificate template updated: id={}", template.id);
        Ok(template.into())
    }

    /// Delete a template and its stored background; students using it keep
    /// their record with no template
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM certificate_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }

        for extension in IMAGE_EXTENSIONS {
            let key = background_key(id, extension);
            if let Err(e) = self.storage.delete(&key).await {
                warn!("Failed to remove template background '{}': {}", key, e);
            }
        }

        info!("Certificate template deleted: id={}", id);
        Ok(())
    }

    /// Store a background image and record its public URL
    pub async fn upload_background(
        &self,
        id: i64,
        file: UploadedFile,
    ) -> Result<TemplateResponseDto> {
        let extension = validate_image(&file, MAX_IMAGE_SIZE)?;
        self.get_by_id(id).await?;

        let key = background_key(id, extension);
        self.storage.put(&key, file.data, &file.content_type).await?;
        let url = self.storage.public_url(&key);

        let template: CertificateTemplate = sqlx::query_as(&format!(
            r#"
            UPDATE certificate_templates
            SET background_image_url = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {}
            "#,
            TEMPLATE_COLUMNS
        ))
        .bind(&url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Self::not_found(id))?;

        info!("Background stored for template {}: {}", id, key);
        Ok(template.into())
    }
}
