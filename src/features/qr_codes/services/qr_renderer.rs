//! QR image rendering.
//!
//! Codes use error correction level L. Modules are `box_size` pixels wide and
//! surrounded by `border` modules of background. An optional logo is scaled
//! to a quarter of the image in each dimension and alpha-blended at the
//! centre.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;
use std::path::Path;

use crate::core::config::QrConfig;
use crate::core::error::{AppError, Result};
use crate::shared::validation::parse_hex_color;

fn rgba(value: &str) -> Result<Rgba<u8>> {
    let [r, g, b] = parse_hex_color(value)
        .ok_or_else(|| AppError::Internal(format!("Invalid QR color '{}'", value)))?;
    Ok(Rgba([r, g, b, 255]))
}

/// Render `url` as a PNG QR code
pub fn render_qr_png(url: &str, config: &QrConfig, logo: Option<&DynamicImage>) -> Result<Vec<u8>> {
    let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::L)
        .map_err(|e| AppError::Internal(format!("Failed to encode QR code: {}", e)))?;

    let dark = rgba(&config.foreground_color)?;
    let light = rgba(&config.background_color)?;

    let modules = code
        .render::<Rgba<u8>>()
        .dark_color(dark)
        .light_color(light)
        .quiet_zone(false)
        .module_dimensions(config.box_size, config.box_size)
        .build();

    let margin = config.border * config.box_size;
    let mut canvas = ImageBuffer::from_pixel(
        modules.width() + 2 * margin,
        modules.height() + 2 * margin,
        light,
    );
    imageops::overlay(&mut canvas, &modules, margin as i64, margin as i64);

    if let Some(logo) = logo {
        let logo = logo
            .resize_exact(canvas.width() / 4, canvas.height() / 4, FilterType::Lanczos3)
            .to_rgba8();
        let x = (canvas.width() - logo.width()) / 2;
        let y = (canvas.height() - logo.height()) / 2;
        imageops::overlay(&mut canvas, &logo, x as i64, y as i64);
    }

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(canvas)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| AppError::Internal(format!("Failed to encode QR image: {}", e)))?;

    Ok(png)
}

/// Read and decode the configured logo
pub async fn load_logo(path: &Path) -> Result<DynamicImage> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        AppError::Internal(format!("Failed to read QR logo '{}': {}", path.display(), e))
    })?;

    image::load_from_memory(&bytes).map_err(|e| {
        AppError::Internal(format!("Failed to decode QR logo '{}': {}", path.display(), e))
    })
}
