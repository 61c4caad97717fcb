//! Upload lifecycle of a file row.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether the bytes behind a file row have reached the object store.
///
/// Rows are created `Pending` when the presigned URL is issued, before any
/// content exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "upload_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    /// URL issued; content not yet observed.
    Pending,
    /// Content observed in the object store.
    Uploaded,
    /// The upload window closed without content.
    Failed,
}

impl UploadStatus {
    /// Check if the status can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Uploaded | Self::Failed)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Uploaded => "uploaded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!UploadStatus::Pending.is_terminal());
        assert!(UploadStatus::Uploaded.is_terminal());
        assert!(UploadStatus::Failed.is_terminal());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&UploadStatus::Uploaded).expect("serialize");
        assert_eq!(json, "\"uploaded\"");
    }
}
