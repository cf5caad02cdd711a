use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::students::dtos::{
    CreateStudentDto, StudentQueryParams, StudentResponseDto, UpdateStudentDto,
};
use crate::features::students::services::StudentService;
use crate::shared::types::{ApiResponse, Meta};

/// Create a student record
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = ApiResponse<StudentResponseDto>),
        (status = 400, description = "Validation error or unknown issuer"),
        (status = 409, description = "Duplicate student")
    ),
    tag = "students"
)]
pub async fn create_student(
    State(service): State<Arc<StudentService>>,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<ApiResponse<StudentResponseDto>>)> {
    let student = service.create(dto).await?;
    let message = format!("Student {} created successfully.", student.student_name);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(student), Some(message), None)),
    ))
}

/// List students with pagination
#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentQueryParams),
    responses(
        (status = 200, description = "List of students", body = ApiResponse<Vec<StudentResponseDto>>)
    ),
    tag = "students"
)]
pub async fn list_students(
    State(service): State<Arc<StudentService>>,
    Query(params): Query<StudentQueryParams>,
) -> Result<Json<ApiResponse<Vec<StudentResponseDto>>>> {
    let (students, total) = service.list(&params).await?;
    Ok(Json(ApiResponse::success(
        Some(students),
        None,
        Some(Meta { total }),
    )))
}

/// Get student by ID
#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = i64, Path, description = "Student record ID")),
    responses(
        (status = 200, description = "Student found", body = ApiResponse<StudentResponseDto>),
        (status = 404, description = "Student not found")
    ),
    tag = "students"
)]
pub async fn get_student(
    State(service): State<Arc<StudentService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<StudentResponseDto>>> {
    let student = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(student), None, None)))
}

/// Update a student record
#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = i64, Path, description = "Student record ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = ApiResponse<StudentResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Duplicate student")
    ),
    tag = "students"
)]
pub async fn update_student(
    State(service): State<Arc<StudentService>>,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<ApiResponse<StudentResponseDto>>> {
    let student = service.update(id, dto).await?;
    let message = format!("Student {} updated successfully.", student.student_name);
    Ok(Json(ApiResponse::success(Some(student), Some(message), None)))
}

/// Delete a student record
#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = i64, Path, description = "Student record ID")),
    responses(
        (status = 200, description = "Student deleted"),
        (status = 404, description = "Student not found")
    ),
    tag = "students"
)]
pub async fn delete_student(
    State(service): State<Arc<StudentService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Student deleted successfully.".to_string()),
        None,
    )))
}
