use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::students::handlers;
use crate::features::students::services::StudentService;

/// Create routes for the students feature
pub fn routes(service: Arc<StudentService>) -> Router {
    Router::new()
        .route(
            "/api/students",
            post(handlers::create_student).get(handlers::list_students),
        )
        .route(
            "/api/students/{id}",
            get(handlers::get_student)
                .put(handlers::update_student)
                .delete(handlers::delete_student),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn server() -> TestServer {
        let service = Arc::new(StudentService::new(
            lazy_test_pool(),
            "http://localhost:3000".to_string(),
        ));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_create_student_rejects_non_positive_id() {
        let response = server()
            .post("/api/students")
            .json(&json!({
                "student_name": "Jane Doe",
                "student_id": 0,
                "programm": "CS",
                "degree_obtained": "BSc",
                "issuer_id": 1
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(
            body["errors"][0],
            "student_id: student_id must be a positive number"
        );
    }

    #[tokio::test]
    async fn test_create_student_rejects_blank_name() {
        let response = server()
            .post("/api/students")
            .json(&json!({
                "student_name": "   ",
                "student_id": 1001,
                "programm": "CS",
                "degree_obtained": "BSc",
                "issuer_id": 1
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("student_name:"));
    }

    #[tokio::test]
    async fn test_create_student_rejects_missing_fields() {
        let response = server()
            .post("/api/students")
            .json(&json!({ "student_name": "Jane Doe" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_get_student_rejects_non_numeric_id() {
        let response = server().get("/api/students/abc").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
