//! Public URL patterns shared by QR generation, API responses and pages.

use uuid::Uuid;

/// Page a student's QR code points at: `<base-url>/certificate/student-qr-info/<id>/`
pub fn student_qr_info_url(base_url: &str, student_pk: i64) -> String {
    format!("{}/certificate/student-qr-info/{}/", base_url, student_pk)
}

/// Public issuer verification page: `<base-url>/certifications/verify-issuer/<uuid>/`
pub fn issuer_verify_url(base_url: &str, issuer_uuid: Uuid) -> String {
    format!("{}/certifications/verify-issuer/{}/", base_url, issuer_uuid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_qr_info_url() {
        assert_eq!(
            student_qr_info_url("https://certs.example.org", 42),
            "https://certs.example.org/certificate/student-qr-info/42/"
        );
    }

    #[test]
    fn test_issuer_verify_url() {
        let uuid = Uuid::parse_str("6f1c2f4e-6b0e-4a8e-9a55-2d8f8f1f0c11").unwrap();
        assert_eq!(
            issuer_verify_url("http://localhost:3000", uuid),
            "http://localhost:3000/certifications/verify-issuer/6f1c2f4e-6b0e-4a8e-9a55-2d8f8f1f0c11/"
        );
    }
}
