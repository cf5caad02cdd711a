mod qr_code_handler;

pub use qr_code_handler::*;
