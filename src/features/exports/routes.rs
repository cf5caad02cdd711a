use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::exports::handlers;
use crate::features::exports::services::ExportService;

/// Create routes for the export feature
pub fn routes(service: Arc<ExportService>) -> Router {
    Router::new()
        .route("/api/students/export", get(handlers::export_students))
        .with_state(service)
}
