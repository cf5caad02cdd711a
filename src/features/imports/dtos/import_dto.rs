use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::imports::models::{CsvUpload, SampleCsv};

/// Student import upload (multipart/form-data)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ImportUploadDto {
    /// CSV file with columns student_name, student_id, programm, degree_obtained,
    /// issuer_name_en and optionally issue_date. Max 5MB.
    #[schema(value_type = String, format = Binary)]
    pub csv_file: Vec<u8>,

    /// Create issuers that do not exist yet instead of failing their rows
    pub create_missing_issuers: Option<bool>,
}

/// Sample CSV upload (multipart/form-data)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadSampleDto {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Outcome of one import run
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportReportDto {
    pub upload_id: i64,
    pub total_records: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub create_missing_issuers: bool,
    /// One human-readable message per failed row
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CsvUploadResponseDto {
    pub id: i64,
    /// Storage key of the uploaded file
    pub file_key: String,
    pub original_filename: String,
    pub file_size: i64,
    pub create_missing_issuers: bool,
    pub processed: bool,
    pub total_records: i32,
    pub successful_records: i32,
    pub failed_records: i32,
    pub error_log: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<CsvUpload> for CsvUploadResponseDto {
    fn from(upload: CsvUpload) -> Self {
        Self {
            id: upload.id,
            file_key: upload.file_key,
            original_filename: upload.original_filename,
            file_size: upload.file_size,
            create_missing_issuers: upload.create_missing_issuers,
            processed: upload.processed,
            total_records: upload.total_records,
            successful_records: upload.successful_records,
            failed_records: upload.failed_records,
            error_log: upload.error_log,
            uploaded_at: upload.uploaded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SampleCsvResponseDto {
    pub id: i64,
    pub file_key: String,
    pub original_filename: String,
    pub file_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<SampleCsv> for SampleCsvResponseDto {
    fn from(sample: SampleCsv) -> Self {
        Self {
            id: sample.id,
            file_key: sample.file_key,
            original_filename: sample.original_filename,
            file_url: sample.file_url,
            created_at: sample.created_at,
        }
    }
}
