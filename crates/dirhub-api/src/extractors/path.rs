//! Typed path parameter helpers.

use uuid::Uuid;

use dirhub_core::error::AppError;
use dirhub_core::types::{FileId, FolderId};

fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(s).map_err(|_| AppError::validation(format!("Invalid UUID: {s}")))
}

/// Parses a folder id from a path segment.
pub fn parse_folder_id(s: &str) -> Result<FolderId, AppError> {
    parse_uuid(s).map(FolderId::from_uuid)
}

/// Parses a file id from a path segment.
pub fn parse_file_id(s: &str) -> Result<FileId, AppError> {
    parse_uuid(s).map(FileId::from_uuid)
}
