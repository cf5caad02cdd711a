mod issuer;

pub use issuer::Issuer;
