use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::certificate_templates::handlers;
use crate::features::certificate_templates::services::TemplateService;
use crate::shared::constants::MAX_IMAGE_SIZE;

/// Create routes for the certificate templates feature
pub fn routes(service: Arc<TemplateService>) -> Router {
    Router::new()
        .route(
            "/api/certificate-templates",
            post(handlers::create_template).get(handlers::list_templates),
        )
        .route(
            "/api/certificate-templates/{id}",
            get(handlers::get_template)
                .put(handlers::update_template)
                .delete(handlers::delete_template),
        )
        .route(
            "/api/certificate-templates/{id}/background",
            post(handlers::upload_background)
                .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 1024 * 1024)),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::shared::test_helpers::memory_storage;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::json;

    fn server() -> TestServer {
        let service = Arc::new(TemplateService::new(lazy_test_pool(), memory_storage()));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_create_template_rejects_bad_color() {
        let response = server()
            .post("/api/certificate-templates")
            .json(&json!({ "name": "Graduation", "text_color": "#12345" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_template_rejects_unknown_position() {
        let response = server()
            .post("/api/certificate-templates")
            .json(&json!({ "name": "Graduation", "qr_code_position": "middle" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_background_rejects_non_image() {
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"%PDF-1.4".to_vec())
                .file_name("background.pdf")
                .mime_type("application/pdf"),
        );

        let response = server()
            .post("/api/certificate-templates/1/background")
            .multipart(form)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
