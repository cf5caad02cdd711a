//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for file storage (local media directory or MinIO/S3).

pub mod storage;
