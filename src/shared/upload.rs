//! Helpers for reading `multipart/form-data` uploads.

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use std::collections::HashMap;
use tracing::debug;

use crate::core::error::{AppError, Result};

/// Allowed MIME types for image uploads (signatures, template backgrounds)
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Extensions an accepted image can be stored with
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "png", "gif", "webp"];

/// A file part read fully into memory
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// All parts of a multipart form: file parts by field name, text parts by field name
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub files: HashMap<String, UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl MultipartForm {
    /// Remove and return a required file part
    pub fn take_file(&mut self, name: &str) -> Result<UploadedFile> {
        self.files
            .remove(name)
            .ok_or_else(|| AppError::BadRequest(format!("Field '{}' must contain a file", name)))
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    debug!("Failed to read multipart data: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload too large: {}", e))
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    }
}

/// Read every part of the form into memory.
///
/// A part with a filename is treated as a file, anything else as a text field.
pub async fn read_multipart(mut multipart: Multipart) -> Result<MultipartForm> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let content_type = field
                .content_type()
                .map(str::to_string)
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let data = field.bytes().await.map_err(multipart_error)?;

            form.files.insert(
                field_name,
                UploadedFile {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                },
            );
        } else {
            let text = field.text().await.map_err(multipart_error)?;
            form.fields.insert(field_name, text);
        }
    }

    Ok(form)
}

/// Reject files above `max_bytes`
pub fn ensure_max_size(file: &UploadedFile, max_bytes: usize) -> Result<()> {
    if file.data.len() > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "File size must be under {} MB.",
            max_bytes / 1024 / 1024
        )));
    }
    Ok(())
}

/// Validate an uploaded image and return the file extension to store it with
pub fn validate_image(file: &UploadedFile, max_bytes: usize) -> Result<&'static str> {
    ensure_max_size(file, max_bytes)?;

    let extension = match file.content_type.as_str() {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        other => {
            return Err(AppError::BadRequest(format!(
                "File type '{}' is not allowed. Allowed types: {}",
                other,
                ALLOWED_IMAGE_TYPES.join(", ")
            )))
        }
    };

    if file.data.is_empty() {
        return Err(AppError::BadRequest("Uploaded image is empty".to_string()));
    }

    Ok(extension)
}

/// Whether a client-supplied file name has a `.csv` extension
pub fn has_csv_extension(file_name: &str) -> bool {
    file_name.to_lowercase().ends_with(".csv")
}
