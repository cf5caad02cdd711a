mod issuer_handler;

pub use issuer_handler::*;
