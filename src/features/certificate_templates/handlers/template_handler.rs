use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::certificate_templates::dtos::{
    CreateTemplateDto, TemplateResponseDto, UpdateTemplateDto, UploadBackgroundDto,
};
use crate::features::certificate_templates::services::TemplateService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};
use crate::shared::upload::read_multipart;

/// Create a certificate template
#[utoipa::path(
    post,
    path = "/api/certificate-templates",
    request_body = CreateTemplateDto,
    responses(
        (status = 201, description = "Template created", body = ApiResponse<TemplateResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "certificate-templates"
)]
pub async fn create_template(
    State(service): State<Arc<TemplateService>>,
    ValidatedJson(dto): ValidatedJson<CreateTemplateDto>,
) -> Result<(StatusCode, Json<ApiResponse<TemplateResponseDto>>)> {
    let template = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(template),
            Some("Certificate template created successfully.".to_string()),
            None,
        )),
    ))
}

/// List certificate templates
#[utoipa::path(
    get,
    path = "/api/certificate-templates",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of templates", body = ApiResponse<Vec<TemplateResponseDto>>)
    ),
    tag = "certificate-templates"
)]
pub async fn list_templates(
    State(service): State<Arc<TemplateService>>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<TemplateResponseDto>>>> {
    let (templates, total) = service.list(&query).await?;
    Ok(Json(ApiResponse::success(
        Some(templates),
        None,
        Some(Meta { total }),
    )))
}

/// Get a certificate template by ID
#[utoipa::path(
    get,
    path = "/api/certificate-templates/{id}",
    params(("id" = i64, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Template found", body = ApiResponse<TemplateResponseDto>),
        (status = 404, description = "Template not found")
    ),
    tag = "certificate-templates"
)]
pub async fn get_template(
    State(service): State<Arc<TemplateService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<TemplateResponseDto>>> {
    let template = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(template), None, None)))
}

/// Update a certificate template
#[utoipa::path(
    put,
    path = "/api/certificate-templates/{id}",
    params(("id" = i64, Path, description = "Template ID")),
    request_body = UpdateTemplateDto,
    responses(
        (status = 200, description = "Template updated", body = ApiResponse<TemplateResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Template not found")
    ),
    tag = "certificate-templates"
)]
pub async fn update_template(
    State(service): State<Arc<TemplateService>>,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateTemplateDto>,
) -> Result<Json<ApiResponse<TemplateResponseDto>>> {
    let template = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(template),
        Some("Certificate template updated successfully.".to_string()),
        None,
    )))
}

/// Delete a certificate template
#[utoipa::path(
    delete,
    path = "/api/certificate-templates/{id}",
    params(("id" = i64, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Template deleted"),
        (status = 404, description = "Template not found")
    ),
    tag = "certificate-templates"
)]
pub async fn delete_template(
    State(service): State<Arc<TemplateService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Certificate template deleted successfully.".to_string()),
        None,
    )))
}

/// Upload the template's background image
#[utoipa::path(
    post,
    path = "/api/certificate-templates/{id}/background",
    params(("id" = i64, Path, description = "Template ID")),
    request_body(content = UploadBackgroundDto, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Background stored", body = ApiResponse<TemplateResponseDto>),
        (status = 400, description = "Invalid image"),
        (status = 404, description = "Template not found"),
        (status = 413, description = "Image too large")
    ),
    tag = "certificate-templates"
)]
pub async fn upload_background(
    State(service): State<Arc<TemplateService>>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<TemplateResponseDto>>> {
    let mut form = read_multipart(multipart).await?;
    let file = form.take_file("file")?;

    let template = service.upload_background(id, file).await?;
    Ok(Json(ApiResponse::success(
        Some(template),
        Some("Background image uploaded successfully.".to_string()),
        None,
    )))
}
