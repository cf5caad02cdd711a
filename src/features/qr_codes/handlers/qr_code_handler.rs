use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::qr_codes::dtos::{QrBatchQuery, QrBatchReportDto, StudentQrDto};
use crate::features::qr_codes::services::QrCodeService;
use crate::shared::types::ApiResponse;

/// Generate QR codes for many students
///
/// With `scope=missing` (default) only students without a QR link are
/// processed; `scope=all` regenerates every code.
#[utoipa::path(
    post,
    path = "/api/students/qr-codes",
    params(QrBatchQuery),
    responses(
        (status = 200, description = "Batch finished", body = ApiResponse<QrBatchReportDto>),
        (status = 500, description = "Logo could not be loaded")
    ),
    tag = "qr-codes"
)]
pub async fn generate_qr_codes(
    State(service): State<Arc<QrCodeService>>,
    Query(query): Query<QrBatchQuery>,
) -> Result<Json<ApiResponse<QrBatchReportDto>>> {
    let report = service.generate_batch(query.scope).await?;

    let mut message = format!("QR codes generated for {} students.", report.generated);
    if report.failed > 0 {
        message.push_str(&format!(" {} failed.", report.failed));
    }
    Ok(Json(ApiResponse::success(Some(report), Some(message), None)))
}

/// Regenerate the QR code of one student
#[utoipa::path(
    post,
    path = "/api/students/{id}/qr-code",
    params(("id" = i64, Path, description = "Student record ID")),
    responses(
        (status = 200, description = "QR code generated", body = ApiResponse<StudentQrDto>),
        (status = 404, description = "Student not found")
    ),
    tag = "qr-codes"
)]
pub async fn generate_student_qr_code(
    State(service): State<Arc<QrCodeService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<StudentQrDto>>> {
    let qr = service.generate_one(id).await?;
    Ok(Json(ApiResponse::success(
        Some(qr),
        Some("QR code generated successfully.".to_string()),
        None,
    )))
}
