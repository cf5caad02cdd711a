use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::issuers::dtos::{
    CreateIssuerDto, IssuerResponseDto, UpdateIssuerDto, UploadImageDto,
};
use crate::features::issuers::services::IssuerService;
use crate::shared::types::ApiResponse;
use crate::shared::upload::read_multipart;

/// Create an issuer
#[utoipa::path(
    post,
    path = "/api/issuers",
    request_body = CreateIssuerDto,
    responses(
        (status = 201, description = "Issuer created", body = ApiResponse<IssuerResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "issuers"
)]
pub async fn create_issuer(
    State(service): State<Arc<IssuerService>>,
    ValidatedJson(dto): ValidatedJson<CreateIssuerDto>,
) -> Result<(StatusCode, Json<ApiResponse<IssuerResponseDto>>)> {
    let issuer = service.create(dto).await?;
    let message = format!("Issuer {} created successfully.", issuer.name_en);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(issuer), Some(message), None)),
    ))
}

/// List all issuers
#[utoipa::path(
    get,
    path = "/api/issuers",
    responses(
        (status = 200, description = "List of issuers", body = ApiResponse<Vec<IssuerResponseDto>>)
    ),
    tag = "issuers"
)]
pub async fn list_issuers(
    State(service): State<Arc<IssuerService>>,
) -> Result<Json<ApiResponse<Vec<IssuerResponseDto>>>> {
    let issuers = service.list().await?;
    Ok(Json(ApiResponse::success(Some(issuers), None, None)))
}

/// Get issuer by ID
#[utoipa::path(
    get,
    path = "/api/issuers/{id}",
    params(("id" = i64, Path, description = "Issuer ID")),
    responses(
        (status = 200, description = "Issuer found", body = ApiResponse<IssuerResponseDto>),
        (status = 404, description = "Issuer not found")
    ),
    tag = "issuers"
)]
pub async fn get_issuer(
    State(service): State<Arc<IssuerService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<IssuerResponseDto>>> {
    let issuer = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(issuer), None, None)))
}

/// Update an issuer
#[utoipa::path(
    put,
    path = "/api/issuers/{id}",
    params(("id" = i64, Path, description = "Issuer ID")),
    request_body = UpdateIssuerDto,
    responses(
        (status = 200, description = "Issuer updated", body = ApiResponse<IssuerResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Issuer not found")
    ),
    tag = "issuers"
)]
pub async fn update_issuer(
    State(service): State<Arc<IssuerService>>,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateIssuerDto>,
) -> Result<Json<ApiResponse<IssuerResponseDto>>> {
    let issuer = service.update(id, dto).await?;
    let message = format!("Issuer {} updated successfully.", issuer.name_en);
    Ok(Json(ApiResponse::success(Some(issuer), Some(message), None)))
}

/// Delete an issuer and, through the foreign key, all of its students
#[utoipa::path(
    delete,
    path = "/api/issuers/{id}",
    params(("id" = i64, Path, description = "Issuer ID")),
    responses(
        (status = 200, description = "Issuer deleted"),
        (status = 404, description = "Issuer not found")
    ),
    tag = "issuers"
)]
pub async fn delete_issuer(
    State(service): State<Arc<IssuerService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Issuer deleted successfully.".to_string()),
        None,
    )))
}

/// Upload the issuer's signature image
///
/// Accepts multipart/form-data with a `file` part.
#[utoipa::path(
    post,
    path = "/api/issuers/{id}/signature",
    params(("id" = i64, Path, description = "Issuer ID")),
    request_body(content = UploadImageDto, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Signature stored", body = ApiResponse<IssuerResponseDto>),
        (status = 400, description = "Invalid image"),
        (status = 404, description = "Issuer not found"),
        (status = 413, description = "Image too large")
    ),
    tag = "issuers"
)]
pub async fn upload_signature(
    State(service): State<Arc<IssuerService>>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<IssuerResponseDto>>> {
    let mut form = read_multipart(multipart).await?;
    let file = form.take_file("file")?;

    let issuer = service.upload_signature(id, file).await?;
    Ok(Json(ApiResponse::success(
        Some(issuer),
        Some("Signature uploaded successfully.".to_string()),
        None,
    )))
}
