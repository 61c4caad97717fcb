//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create folder request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255, message = "Folder name is required"))]
    pub name: String,
    /// Parent folder ID (absent for a root folder).
    pub parent_id: Option<Uuid>,
    /// Owner of the new folder.
    pub owner_id: Uuid,
}

/// Create file request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFileRequest {
    /// File name.
    #[validate(length(min = 1, max = 255, message = "File name is required"))]
    pub name: String,
    /// Containing folder.
    pub folder_id: Uuid,
    /// Declared size in bytes.
    #[validate(range(min = 0, message = "Size cannot be negative"))]
    pub size: Option<i64>,
    /// Declared MIME type.
    #[validate(length(max = 255))]
    pub mime_type: Option<String>,
    /// The user registering the file.
    pub uploaded_by: Uuid,
}

/// Query parameters for a reconciliation pass.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReconcileQuery {
    /// Most rows to settle in this pass.
    #[validate(range(min = 1, max = 10000))]
    #[serde(default = "default_reconcile_limit")]
    pub limit: i64,
}

fn default_reconcile_limit() -> i64 {
    500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_folder_name_is_rejected() {
        let req = CreateFolderRequest {
            name: String::new(),
            parent_id: None,
            owner_id: Uuid::new_v4(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_negative_size_is_rejected() {
        let req = CreateFileRequest {
            name: "a.txt".to_string(),
            folder_id: Uuid::new_v4(),
            size: Some(-1),
            mime_type: None,
            uploaded_by: Uuid::new_v4(),
        };
        assert!(req.validate().is_err());

        let req = CreateFileRequest {
            size: None,
            ..req
        };
        assert!(req.validate().is_ok());
    }
}
