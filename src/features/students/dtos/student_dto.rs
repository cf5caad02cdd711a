use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::students::models::StudentRecord;
use crate::shared::constants::MAX_PAGE_SIZE;
use crate::shared::types::{default_page, default_page_size};
use crate::shared::urls::student_qr_info_url;
use crate::shared::validation::{trimmed, trimmed_opt};

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`)
fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

// Query params for listing students
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct StudentQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    /// Search in student name or programme
    pub search: Option<String>,

    /// Only students of this issuer
    pub issuer_id: Option<i64>,
}

impl StudentQueryParams {
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }

    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// `ILIKE` pattern matching the search text literally anywhere in a value
    pub fn search_pattern(&self) -> Option<String> {
        let search = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let mut pattern = String::with_capacity(search.len() + 2);
        pattern.push('%');
        for c in search.chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        Some(pattern)
    }
}

// Create request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Jane Doe")]
    pub student_name: String,

    #[validate(range(min = 1, message = "student_id must be a positive number"))]
    #[schema(example = 1001)]
    pub student_id: i64,

    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Computer Science")]
    pub programm: String,

    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Bachelor of Science")]
    pub degree_obtained: String,

    pub issuer_id: i64,

    pub template_id: Option<i64>,
}

// Update request; issue_date and qr_code_link are not editable
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1, max = 100))]
    pub student_name: Option<String>,

    #[validate(range(min = 1, message = "student_id must be a positive number"))]
    pub student_id: Option<i64>,

    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1, max = 100))]
    pub programm: Option<String>,

    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1, max = 100))]
    pub degree_obtained: Option<String>,

    pub issuer_id: Option<i64>,

    /// Omit to keep the current template, `null` to clear it
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i64>)]
    pub template_id: Option<Option<i64>>,
}

// Response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentResponseDto {
    pub id: i64,
    pub student_name: String,
    pub student_id: i64,
    pub programm: String,
    pub degree_obtained: String,
    pub issuer_id: i64,
    pub issuer_name: String,
    pub template_id: Option<i64>,
    pub issue_date: DateTime<Utc>,
    /// URL of the stored QR image, set once QR generation has run
    pub qr_code_link: Option<String>,
    /// Page the QR code points at
    pub verification_url: String,
}

impl StudentResponseDto {
    pub fn from_record(record: StudentRecord, base_url: &str) -> Self {
        Self {
            verification_url: student_qr_info_url(base_url, record.id),
            id: record.id,
            student_name: record.student_name,
            student_id: record.student_id,
            programm: record.programm,
            degree_obtained: record.degree_obtained,
            issuer_id: record.issuer_id,
            issuer_name: record.issuer_name,
            template_id: record.template_id,
            issue_date: record.issue_date,
            qr_code_link: record.qr_code_link,
        }
    }
}
