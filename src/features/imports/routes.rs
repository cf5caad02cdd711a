use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::imports::handlers;
use crate::features::imports::services::ImportService;

/// Create routes for the imports feature
pub fn routes(service: Arc<ImportService>) -> Router {
    // Leave room above the file limit so oversized files reach the size check
    let body_limit = service.max_upload_bytes() + 1024 * 1024;

    Router::new()
        .route(
            "/api/students/import",
            post(handlers::import_students).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/students/import/sample", get(handlers::download_sample))
        .route("/api/csv-uploads", get(handlers::list_csv_uploads))
        .route(
            "/api/sample-csvs",
            post(handlers::upload_sample_csv)
                .layer(DefaultBodyLimit::max(body_limit))
                .get(handlers::list_sample_csvs),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ImportConfig;
    use crate::core::database::lazy_test_pool;
    use crate::shared::test_helpers::memory_storage;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;

    fn server() -> TestServer {
        let service = Arc::new(ImportService::new(
            lazy_test_pool(),
            memory_storage(),
            ImportConfig::default(),
        ));
        TestServer::new(routes(service)).unwrap()
    }

    fn csv_form(file_name: &str, data: Vec<u8>) -> MultipartForm {
        MultipartForm::new().add_part(
            "csv_file",
            Part::bytes(data).file_name(file_name).mime_type("text/csv"),
        )
    }

    #[tokio::test]
    async fn test_import_rejects_non_csv_extension() {
        let response = server()
            .post("/api/students/import")
            .multipart(csv_form("students.xlsx", b"student_name\n".to_vec()))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "File must be a CSV file (.csv).");
    }

    #[tokio::test]
    async fn test_import_rejects_oversized_file() {
        let data = vec![b'a'; 5 * 1024 * 1024 + 1];
        let response = server()
            .post("/api/students/import")
            .multipart(csv_form("students.csv", data))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_import_rejects_missing_columns() {
        let response = server()
            .post("/api/students/import")
            .multipart(csv_form(
                "students.csv",
                b"student_name,student_id\nJane Doe,1001\n".to_vec(),
            ))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("missing required columns"));
    }

    #[tokio::test]
    async fn test_import_requires_file_part() {
        let form = MultipartForm::new().add_text("create_missing_issuers", "true");
        let response = server()
            .post("/api/students/import")
            .multipart(form)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_download_sample() {
        let response = server().get("/api/students/import/sample").await;

        response.assert_status_ok();
        let disposition = response.header("content-disposition");
        assert_eq!(
            disposition.to_str().unwrap(),
            "attachment; filename=\"sample_students.csv\""
        );
        let body = response.text();
        assert!(body.starts_with("student_name,student_id,programm,degree_obtained,issuer_name_en"));
        assert!(body.contains("John Doe,12345,Computer Science,Bachelor of Science,University of Example"));
    }

    #[tokio::test]
    async fn test_sample_upload_rejects_non_csv() {
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"hello".to_vec()).file_name("notes.txt"),
        );
        let response = server().post("/api/sample-csvs").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
