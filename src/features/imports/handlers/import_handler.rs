use axum::{
    extract::{Multipart, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::imports::dtos::{
    CsvUploadResponseDto, ImportReportDto, ImportUploadDto, SampleCsvResponseDto,
    UploadSampleDto,
};
use crate::features::imports::services::ImportService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};
use crate::shared::upload::read_multipart;

const SAMPLE_FILENAME: &str = "sample_students.csv";

/// Parse an HTML-form style boolean
fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" | "" => Ok(false),
        other => Err(AppError::BadRequest(format!(
            "Field '{}' must be true or false, got '{}'",
            name, other
        ))),
    }
}

/// Import students from a CSV file
///
/// Accepts multipart/form-data with a `csv_file` part and an optional
/// `create_missing_issuers` field. Rows that fail are listed in `errors`;
/// all other rows are imported.
#[utoipa::path(
    post,
    path = "/api/students/import",
    request_body(content = ImportUploadDto, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Import finished", body = ApiResponse<ImportReportDto>),
        (status = 400, description = "Not a CSV file, undecodable file or missing columns"),
        (status = 413, description = "File too large")
    ),
    tag = "imports"
)]
pub async fn import_students(
    State(service): State<Arc<ImportService>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ImportReportDto>>> {
    let mut form = read_multipart(multipart).await?;
    let file = form.take_file("csv_file")?;
    let create_missing_issuers = form
        .field("create_missing_issuers")
        .map(|value| parse_flag("create_missing_issuers", value))
        .transpose()?;

    let report = service.import_csv(file, create_missing_issuers).await?;

    let mut message = format!("Successfully imported {} students.", report.success_count);
    if report.failure_count > 0 {
        message.push_str(&format!(" Failed to import {} rows.", report.failure_count));
    }

    Ok(Json(ApiResponse::success(Some(report), Some(message), None)))
}

/// Download an example import file
#[utoipa::path(
    get,
    path = "/api/students/import/sample",
    responses(
        (status = 200, description = "Sample CSV", content_type = "text/csv")
    ),
    tag = "imports"
)]
pub async fn download_sample(
    State(service): State<Arc<ImportService>>,
) -> Result<impl IntoResponse> {
    let body = service.sample_file()?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", SAMPLE_FILENAME),
            ),
        ],
        body,
    ))
}

/// List import runs, newest first
#[utoipa::path(
    get,
    path = "/api/csv-uploads",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Import history", body = ApiResponse<Vec<CsvUploadResponseDto>>)
    ),
    tag = "imports"
)]
pub async fn list_csv_uploads(
    State(service): State<Arc<ImportService>>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<CsvUploadResponseDto>>>> {
    let (uploads, total) = service.list_uploads(&query).await?;
    Ok(Json(ApiResponse::success(
        Some(uploads),
        None,
        Some(Meta { total }),
    )))
}

/// Upload a sample CSV file for users to download
#[utoipa::path(
    post,
    path = "/api/sample-csvs",
    request_body(content = UploadSampleDto, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Sample stored", body = ApiResponse<SampleCsvResponseDto>),
        (status = 400, description = "Not a CSV file"),
        (status = 413, description = "File too large")
    ),
    tag = "imports"
)]
pub async fn upload_sample_csv(
    State(service): State<Arc<ImportService>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<SampleCsvResponseDto>>)> {
    let mut form = read_multipart(multipart).await?;
    let file = form.take_file("file")?;

    let sample = service.upload_sample(file).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(sample),
            Some("Sample CSV uploaded successfully.".to_string()),
            None,
        )),
    ))
}

/// List uploaded sample CSV files
#[utoipa::path(
    get,
    path = "/api/sample-csvs",
    responses(
        (status = 200, description = "Sample files", body = ApiResponse<Vec<SampleCsvResponseDto>>)
    ),
    tag = "imports"
)]
pub async fn list_sample_csvs(
    State(service): State<Arc<ImportService>>,
) -> Result<Json<ApiResponse<Vec<SampleCsvResponseDto>>>> {
    let samples = service.list_samples().await?;
    Ok(Json(ApiResponse::success(Some(samples), None, None)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("f", "true").unwrap());
        assert!(parse_flag("f", "ON").unwrap());
        assert!(!parse_flag("f", "0").unwrap());
        assert!(!parse_flag("f", "").unwrap());
        assert!(parse_flag("f", "maybe").is_err());
    }
}
