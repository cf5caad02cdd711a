pub mod qr_code_dto;

pub use qr_code_dto::{QrBatchQuery, QrBatchReportDto, QrScope, StudentQrDto};
