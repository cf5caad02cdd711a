use axum::{routing::post, Router};
use std::sync::Arc;

use crate::features::qr_codes::handlers;
use crate::features::qr_codes::services::QrCodeService;

/// Create routes for the QR code feature
pub fn routes(service: Arc<QrCodeService>) -> Router {
    Router::new()
        .route("/api/students/qr-codes", post(handlers::generate_qr_codes))
        .route(
            "/api/students/{id}/qr-code",
            post(handlers::generate_student_qr_code),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::QrConfig;
    use crate::core::database::lazy_test_pool;
    use crate::shared::test_helpers::memory_storage;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_unreadable_logo_fails_before_any_student() {
        let config = QrConfig {
            logo_path: Some(PathBuf::from("/nonexistent/logo.png")),
            ..QrConfig::default()
        };
        let service = Arc::new(QrCodeService::new(
            lazy_test_pool(),
            memory_storage(),
            config,
            "http://localhost:3000".to_string(),
        ));
        let server = TestServer::new(routes(service)).unwrap();

        let response = server.post("/api/students/qr-codes").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_unknown_scope_rejected() {
        let service = Arc::new(QrCodeService::new(
            lazy_test_pool(),
            memory_storage(),
            QrConfig::default(),
            "http://localhost:3000".to_string(),
        ));
        let server = TestServer::new(routes(service)).unwrap();

        let response = server
            .post("/api/students/qr-codes")
            .add_query_param("scope", "some")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
