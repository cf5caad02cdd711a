use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::issuers::models::Issuer;
use crate::shared::urls::issuer_verify_url;
use crate::shared::validation::{trimmed, trimmed_opt};

/// Request DTO for creating an issuer
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateIssuerDto {
    /// Issuer name in English
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "name_en must be 1-100 characters"))]
    #[schema(example = "University of Example")]
    pub name_en: String,
}

/// Request DTO for updating an issuer
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateIssuerDto {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1, max = 100, message = "name_en must be 1-100 characters"))]
    pub name_en: Option<String>,
}

/// Multipart image upload, for OpenAPI documentation only.
/// The handler reads the form with axum's Multipart extractor.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadImageDto {
    /// PNG, JPEG, GIF or WEBP image, at most 5 MB
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Response DTO for issuer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IssuerResponseDto {
    pub id: i64,
    pub name_en: String,
    pub uuid: Uuid,
    pub signature_url: Option<String>,
    /// Public verification page for this issuer
    pub verify_url: String,
    pub created_at: DateTime<Utc>,
}

impl IssuerResponseDto {
    pub fn from_model(issuer: Issuer, base_url: &str) -> Self {
        Self {
            verify_url: issuer_verify_url(base_url, issuer.uuid),
            id: issuer.id,
            name_en: issuer.name_en,
            uuid: issuer.uuid,
            signature_url: issuer.signature_url,
            created_at: issuer.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_issuer_validation() {
        let valid = CreateIssuerDto {
            name_en: "Acme U".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty = CreateIssuerDto {
            name_en: String::new(),
        };
        assert!(empty.validate().is_err());

        let too_long = CreateIssuerDto {
            name_en: "x".repeat(101),
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_blank_issuer_name_is_rejected() {
        let blank: CreateIssuerDto =
            serde_json::from_value(serde_json::json!({ "name_en": " \t " })).unwrap();
        assert!(blank.validate().is_err());

        let padded: CreateIssuerDto =
            serde_json::from_value(serde_json::json!({ "name_en": "  Acme U " })).unwrap();
        assert_eq!(padded.name_en, "Acme U");
    }

    #[test]
    fn test_update_issuer_allows_missing_name() {
        let dto = UpdateIssuerDto { name_en: None };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_response_carries_verify_url() {
        let uuid = Uuid::new_v4();
        let issuer = Issuer {
            id: 3,
            name_en: "Acme U".to_string(),
            uuid,
            signature_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let dto = IssuerResponseDto::from_model(issuer, "https://certs.example.org");
        assert_eq!(
            dto.verify_url,
            format!("https://certs.example.org/certifications/verify-issuer/{}/", uuid)
        );
    }
}
