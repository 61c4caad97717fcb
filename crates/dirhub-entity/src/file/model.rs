//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use dirhub_core::types::{FileId, FolderId, UserId};

use super::status::UploadStatus;

/// A file whose bytes live in the object store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// The file name (including extension); also its path segment.
    pub name: String,
    /// The folder containing this file.
    pub folder_id: FolderId,
    /// Full materialized path (e.g., `/docs/2024/report.pdf`).
    pub full_path: String,
    /// Key of the object in the bucket.
    pub object_key: String,
    /// Declared or observed size in bytes.
    pub size: Option<i64>,
    /// Declared MIME type.
    pub mime_type: Option<String>,
    /// The user who created the file.
    pub uploaded_by: UserId,
    /// Upload lifecycle state.
    pub status: UploadStatus,
    /// When the presigned upload URL stops working.
    pub upload_expires_at: Option<DateTime<Utc>>,
    /// Presigned upload URL; only present on the creation response.
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_url: Option<String>,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.name)
            .map(|ext| ext.to_lowercase())
    }

    /// Whether the upload window has closed at `now`.
    pub fn upload_window_closed(&self, now: DateTime<Utc>) -> bool {
        self.upload_expires_at.is_some_and(|at| at <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn file(name: &str) -> File {
        let now = Utc::now();
        File {
            id: FileId::new(),
            name: name.to_string(),
            folder_id: FolderId::new(),
            full_path: format!("/docs/{name}"),
            object_key: format!("docs/{name}"),
            size: None,
            mime_type: None,
            uploaded_by: UserId::new(),
            status: UploadStatus::Pending,
            upload_expires_at: Some(now + Duration::minutes(60)),
            upload_url: Some("https://example.invalid/upload".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_extension() {
        assert_eq!(file("report.PDF").extension(), Some("pdf".to_string()));
        assert_eq!(file("Makefile").extension(), None);
    }

    #[test]
    fn test_upload_window() {
        let f = file("a.txt");
        assert!(!f.upload_window_closed(Utc::now()));
        assert!(f.upload_window_closed(Utc::now() + Duration::hours(2)));
    }

    #[test]
    fn test_upload_url_omitted_when_absent() {
        let mut f = file("a.txt");
        f.upload_url = None;
        let json = serde_json::to_value(&f).expect("serialize");
        assert!(json.get("upload_url").is_none());
        assert_eq!(json["status"], "pending");
    }
}
