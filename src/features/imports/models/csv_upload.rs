use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Bookkeeping row written for every import run
#[derive(Debug, Clone, FromRow)]
pub struct CsvUpload {
    pub id: i64,
    pub file_key: String,
    pub original_filename: String,
    pub file_size: i64,
    pub create_missing_issuers: bool,
    pub processed: bool,
    pub total_records: i32,
    pub successful_records: i32,
    pub failed_records: i32,
    /// One failure message per line
    pub error_log: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SampleCsv {
    pub id: i64,
    pub file_key: String,
    pub original_filename: String,
    pub file_url: String,
    pub created_at: DateTime<Utc>,
}
