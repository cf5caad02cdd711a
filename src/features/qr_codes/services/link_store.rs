use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::Result;
use crate::features::qr_codes::dtos::QrScope;

/// Student lookups and link updates used by QR generation
#[async_trait]
pub trait QrLinkStore: Send + Sync {
    /// Ids of the students a batch covers, ascending
    async fn student_ids(&self, scope: QrScope) -> Result<Vec<i64>>;

    async fn student_exists(&self, id: i64) -> Result<bool>;

    /// Record the stored image URL; `false` when the student is gone
    async fn set_link(&self, id: i64, qr_code_link: &str) -> Result<bool>;
}

pub struct PgQrLinkStore {
    pool: PgPool,
}

impl PgQrLinkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QrLinkStore for PgQrLinkStore {
    async fn student_ids(&self, scope: QrScope) -> Result<Vec<i64>> {
        let sql = match scope {
            QrScope::Missing => {
                "SELECT id FROM students WHERE qr_code_link IS NULL OR qr_code_link = '' ORDER BY id"
            }
            QrScope::All => "SELECT id FROM students ORDER BY id",
        };
        let ids: Vec<i64> = sqlx::query_scalar(sql).fetch_all(&self.pool).await?;
        Ok(ids)
    }

    async fn student_exists(&self, id: i64) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn set_link(&self, id: i64, qr_code_link: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE students SET qr_code_link = $1 WHERE id = $2")
            .bind(qr_code_link)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
