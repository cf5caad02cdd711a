pub mod certificate_templates;
pub mod exports;
pub mod imports;
pub mod issuers;
pub mod qr_codes;
pub mod students;
pub mod verification;
