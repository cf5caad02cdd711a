mod csv_reader;
mod import_runner;
mod import_service;
mod import_store;

pub use import_service::ImportService;
