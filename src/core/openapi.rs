use utoipa::{Modify, OpenApi};

use crate::features::certificate_templates::{
    dtos as templates_dtos, handlers as templates_handlers, models as templates_models,
};
use crate::features::exports::handlers as exports_handlers;
use crate::features::imports::{dtos as imports_dtos, handlers as imports_handlers};
use crate::features::issuers::{dtos as issuers_dtos, handlers as issuers_handlers};
use crate::features::qr_codes::{dtos as qr_dtos, handlers as qr_handlers};
use crate::features::students::{dtos as students_dtos, handlers as students_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Issuers
        issuers_handlers::create_issuer,
        issuers_handlers::list_issuers,
        issuers_handlers::get_issuer,
        issuers_handlers::update_issuer,
        issuers_handlers::delete_issuer,
        issuers_handlers::upload_signature,
        // Students
        students_handlers::create_student,
        students_handlers::list_students,
        students_handlers::get_student,
        students_handlers::update_student,
        students_handlers::delete_student,
        // Certificate templates
        templates_handlers::create_template,
        templates_handlers::list_templates,
        templates_handlers::get_template,
        templates_handlers::update_template,
        templates_handlers::delete_template,
        templates_handlers::upload_background,
        // Imports
        imports_handlers::import_students,
        imports_handlers::download_sample,
        imports_handlers::list_csv_uploads,
        imports_handlers::upload_sample_csv,
        imports_handlers::list_sample_csvs,
        // QR codes
        qr_handlers::generate_qr_codes,
        qr_handlers::generate_student_qr_code,
        // Exports
        exports_handlers::export_students,
    ),
    components(
        schemas(
            Meta,
            // Issuers
            issuers_dtos::CreateIssuerDto,
            issuers_dtos::UpdateIssuerDto,
            issuers_dtos::UploadImageDto,
            issuers_dtos::IssuerResponseDto,
            ApiResponse<issuers_dtos::IssuerResponseDto>,
            ApiResponse<Vec<issuers_dtos::IssuerResponseDto>>,
            // Students
            students_dtos::CreateStudentDto,
            students_dtos::UpdateStudentDto,
            students_dtos::StudentResponseDto,
            ApiResponse<students_dtos::StudentResponseDto>,
            ApiResponse<Vec<students_dtos::StudentResponseDto>>,
            // Certificate templates
            templates_models::QrCodePosition,
            templates_dtos::CreateTemplateDto,
            templates_dtos::UpdateTemplateDto,
            templates_dtos::UploadBackgroundDto,
            templates_dtos::TemplateResponseDto,
            ApiResponse<templates_dtos::TemplateResponseDto>,
            ApiResponse<Vec<templates_dtos::TemplateResponseDto>>,
            // Imports
            imports_dtos::ImportUploadDto,
            imports_dtos::UploadSampleDto,
            imports_dtos::ImportReportDto,
            imports_dtos::CsvUploadResponseDto,
            imports_dtos::SampleCsvResponseDto,
            ApiResponse<imports_dtos::ImportReportDto>,
            ApiResponse<Vec<imports_dtos::CsvUploadResponseDto>>,
            ApiResponse<imports_dtos::SampleCsvResponseDto>,
            ApiResponse<Vec<imports_dtos::SampleCsvResponseDto>>,
            // QR codes
            qr_dtos::QrScope,
            qr_dtos::QrBatchReportDto,
            qr_dtos::StudentQrDto,
            ApiResponse<qr_dtos::QrBatchReportDto>,
            ApiResponse<qr_dtos::StudentQrDto>,
        )
    ),
    tags(
        (name = "issuers", description = "Certificate issuers and their signatures"),
        (name = "students", description = "Student certification records"),
        (name = "certificate-templates", description = "Certificate styling templates"),
        (name = "imports", description = "Bulk CSV import of students"),
        (name = "qr-codes", description = "Verification QR code generation"),
        (name = "exports", description = "Zip export of student data and QR images"),
    ),
    info(
        title = "Certifications API",
        version = "0.1.0",
        description = "API documentation for student certification records",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_feature_paths() {
        let doc = ApiDoc::openapi();

        for path in [
            "/api/issuers",
            "/api/students/{id}",
            "/api/students/import",
            "/api/students/qr-codes",
            "/api/students/export",
            "/api/certificate-templates/{id}/background",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {}", path);
        }
    }

    #[test]
    fn test_swagger_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Custom".to_string(),
            version: "9.9.9".to_string(),
            description: "Overridden".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Custom");
        assert_eq!(doc.info.version, "9.9.9");
        assert_eq!(doc.info.description.as_deref(), Some("Overridden"));
    }
}
