use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::certificate_templates::models::{CertificateTemplate, QrCodePosition};
use crate::shared::validation::{trimmed, trimmed_opt, HEX_COLOR_REGEX};

fn default_font() -> String {
    "Helvetica".to_string()
}

fn default_title_font_size() -> i32 {
    24
}

fn default_body_font_size() -> i32 {
    18
}

fn default_text_color() -> String {
    "#000000".to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTemplateDto {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Graduation 2024")]
    pub name: String,

    #[serde(default = "default_font", deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 50))]
    pub font: String,

    #[serde(default = "default_title_font_size")]
    #[validate(range(min = 6, max = 200))]
    pub title_font_size: i32,

    #[serde(default = "default_body_font_size")]
    #[validate(range(min = 6, max = 200))]
    pub body_font_size: i32,

    #[serde(default = "default_text_color")]
    #[validate(regex(path = *HEX_COLOR_REGEX, message = "text_color must look like #RRGGBB"))]
    #[schema(example = "#000000")]
    pub text_color: String,

    #[serde(default)]
    pub qr_code_position: QrCodePosition,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTemplateDto {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1, max = 50))]
    pub font: Option<String>,

    #[validate(range(min = 6, max = 200))]
    pub title_font_size: Option<i32>,

    #[validate(range(min = 6, max = 200))]
    pub body_font_size: Option<i32>,

    #[validate(regex(path = *HEX_COLOR_REGEX, message = "text_color must look like #RRGGBB"))]
    pub text_color: Option<String>,

    pub qr_code_position: Option<QrCodePosition>,
}

/// Background image upload (multipart/form-data)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadBackgroundDto {
    /// PNG, JPEG, GIF or WEBP image, max 5MB
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemplateResponseDto {
    pub id: i64,
    pub name: String,
    pub background_image_url: Option<String>,
    pub font: String,
    pub title_font_size: i32,
    pub body_font_size: i32,
    pub text_color: String,
    pub qr_code_position: QrCodePosition,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CertificateTemplate> for TemplateResponseDto {
    fn from(t: CertificateTemplate) -> Self {
        Self {
            id: t.id,
            name: t.name,
            background_image_url: t.background_image_url,
            font: t.font,
            title_font_size: t.title_font_size,
            body_font_size: t.body_font_size,
            text_color: t.text_color,
            qr_code_position: t.qr_code_position,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}
