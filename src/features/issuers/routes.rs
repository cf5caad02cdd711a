use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::issuers::handlers;
use crate::features::issuers::services::IssuerService;
use crate::shared::constants::MAX_IMAGE_SIZE;

/// Create routes for the issuers feature
pub fn routes(service: Arc<IssuerService>) -> Router {
    Router::new()
        .route(
            "/api/issuers",
            post(handlers::create_issuer).get(handlers::list_issuers),
        )
        .route(
            "/api/issuers/{id}",
            get(handlers::get_issuer)
                .put(handlers::update_issuer)
                .delete(handlers::delete_issuer),
        )
        .route(
            "/api/issuers/{id}/signature",
            // Allow the image plus a buffer for multipart overhead
            post(handlers::upload_signature).layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 1024 * 1024)),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::shared::test_helpers::memory_storage;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn server() -> TestServer {
        let service = Arc::new(IssuerService::new(
            lazy_test_pool(),
            memory_storage(),
            "http://localhost:3000".to_string(),
        ));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_create_issuer_rejects_empty_name() {
        let response = server()
            .post("/api/issuers")
            .json(&json!({ "name_en": "" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_create_issuer_rejects_malformed_json() {
        let response = server()
            .post("/api/issuers")
            .json(&json!({ "unexpected": 1 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
