mod link_store;
mod qr_code_service;
mod qr_renderer;

pub use qr_code_service::QrCodeService;
