pub mod issuer_dto;

pub use issuer_dto::{CreateIssuerDto, IssuerResponseDto, UpdateIssuerDto, UploadImageDto};
