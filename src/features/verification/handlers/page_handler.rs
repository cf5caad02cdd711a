use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use minijinja::context;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::verification::services::VerificationService;
use crate::shared::pages::render_page;

fn page(template: &str, ctx: minijinja::Value) -> Result<Html<String>> {
    render_page(template, ctx)
        .map(Html)
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Render the not-found page, falling back to plain text if it cannot render
fn not_found_page(message: &str) -> Response {
    match render_page("not_found.html", context! { message => message }) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render not-found page: {}", e);
            (StatusCode::NOT_FOUND, message.to_string()).into_response()
        }
    }
}

/// Turn a lookup result into a page; missing records render the not-found page
fn respond<T>(lookup: Result<T>, render: impl FnOnce(T) -> Result<Html<String>>) -> Response {
    match lookup.and_then(render) {
        Ok(html) => html.into_response(),
        Err(AppError::NotFound(message)) => not_found_page(&message),
        Err(e) => e.into_response(),
    }
}

/// Page a student's QR code points at
pub async fn student_qr_info(
    State(service): State<Arc<VerificationService>>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = id.parse::<i64>() else {
        return not_found_page("Student not found");
    };

    respond(service.student(id).await, |student| {
        page("student_qr_info.html", context! { student => student })
    })
}

/// Certificate verification page for one student
pub async fn verify_student(
    State(service): State<Arc<VerificationService>>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = id.parse::<i64>() else {
        return not_found_page("Student not found");
    };

    respond(service.student(id).await, |student| {
        page("student_verification.html", context! { student => student })
    })
}

/// Issuer verification page listing all of its students
pub async fn verify_issuer(
    State(service): State<Arc<VerificationService>>,
    Path(uuid): Path<String>,
) -> Response {
    let Ok(uuid) = Uuid::parse_str(&uuid) else {
        return not_found_page("Issuer not found");
    };

    respond(service.issuer(uuid).await, |issuer| {
        page("verify_issuer.html", context! { issuer => issuer })
    })
}
