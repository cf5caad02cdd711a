mod certificate_template;

pub use certificate_template::{CertificateTemplate, QrCodePosition};
