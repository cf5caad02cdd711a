/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// STORAGE LAYOUT
// =============================================================================

/// Prefix for generated QR code images
pub const QR_CODE_PREFIX: &str = "qr_codes";

/// Prefix for issuer signature images
pub const SIGNATURE_PREFIX: &str = "signatures";

/// Prefix for certificate template backgrounds
pub const TEMPLATE_BACKGROUND_PREFIX: &str = "certificate_templates";

/// Prefix for uploaded import files
pub const CSV_UPLOAD_PREFIX: &str = "uploads/csv";

/// Prefix for admin-provided sample CSV files
pub const SAMPLE_CSV_PREFIX: &str = "sample_csv";

/// Maximum size for uploaded images (5MB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Storage key of the QR image for a student row
pub fn qr_code_key(student_pk: i64) -> String {
    format!("{}/student_{}.png", QR_CODE_PREFIX, student_pk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_code_key() {
        assert_eq!(qr_code_key(7), "qr_codes/student_7.png");
    }
}
