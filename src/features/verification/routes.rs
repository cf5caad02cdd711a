use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::verification::handlers;
use crate::features::verification::services::VerificationService;

/// Public HTML pages; no authentication
pub fn routes(service: Arc<VerificationService>) -> Router {
    Router::new()
        .route(
            "/certificate/student-qr-info/{id}/",
            get(handlers::student_qr_info),
        )
        .route("/certifications/verify/{id}/", get(handlers::verify_student))
        .route(
            "/certifications/verify-issuer/{uuid}/",
            get(handlers::verify_issuer),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::features::issuers::IssuerService;
    use crate::features::students::StudentService;
    use crate::shared::test_helpers::memory_storage;
    use axum::http::StatusCode;
    use axum_test::TestServer;

    fn server() -> TestServer {
        let base_url = "http://localhost:3000".to_string();
        let students = Arc::new(StudentService::new(lazy_test_pool(), base_url.clone()));
        let issuers = Arc::new(IssuerService::new(
            lazy_test_pool(),
            memory_storage(),
            base_url.clone(),
        ));
        let service = Arc::new(VerificationService::new(students, issuers, base_url));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_malformed_issuer_uuid_renders_not_found() {
        let response = server()
            .get("/certifications/verify-issuer/not-a-uuid/")
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("Issuer not found"));
    }

    #[tokio::test]
    async fn test_malformed_student_id_renders_not_found() {
        let response = server().get("/certificate/student-qr-info/abc/").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}
