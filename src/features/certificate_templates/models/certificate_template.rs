use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Corner of the certificate the QR code is placed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "qr_code_position", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QrCodePosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl std::fmt::Display for QrCodePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QrCodePosition::TopLeft => write!(f, "top_left"),
            QrCodePosition::TopRight => write!(f, "top_right"),
            QrCodePosition::BottomLeft => write!(f, "bottom_left"),
            QrCodePosition::BottomRight => write!(f, "bottom_right"),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CertificateTemplate {
    pub id: i64,
    pub name: String,
    pub background_image_url: Option<String>,
    pub font: String,
    pub title_font_size: i32,
    pub body_font_size: i32,
    /// `#RRGGBB`
    pub text_color: String,
    pub qr_code_position: QrCodePosition,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
