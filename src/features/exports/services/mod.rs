mod archive;
mod export_service;

pub use archive::ARCHIVE_FILENAME;
pub use export_service::ExportService;
