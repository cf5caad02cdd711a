use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::exports::services::{ExportService, ARCHIVE_FILENAME};

/// Download all student data and QR images as a zip archive
#[utoipa::path(
    get,
    path = "/api/students/export",
    responses(
        (status = 200, description = "Zip archive with student_data.csv and qr_codes/", content_type = "application/zip")
    ),
    tag = "exports"
)]
pub async fn export_students(
    State(service): State<Arc<ExportService>>,
) -> Result<impl IntoResponse> {
    let archive = service.export_archive().await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", ARCHIVE_FILENAME),
            ),
        ],
        archive,
    ))
}
