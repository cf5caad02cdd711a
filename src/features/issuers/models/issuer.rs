use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for issuers
#[derive(Debug, Clone, FromRow)]
pub struct Issuer {
    pub id: i64,
    pub name_en: String,
    /// Public identifier used in verification links; never changes
    pub uuid: Uuid,
    pub signature_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
