//! Object store gateway trait for S3-compatible backends.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// Content type used when the caller does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Presigned URL lifetime used when the caller passes none or a non-positive value.
pub const DEFAULT_EXPIRY_MINUTES: i64 = 60;

/// Longest presigned URL lifetime S3 signs (seven days).
pub const MAX_EXPIRY_MINUTES: i64 = 10_080;

/// Resolve a requested URL lifetime: non-positive or absent means the
/// default, anything above the provider maximum is clamped to it.
pub fn presign_expiry(minutes: Option<i64>) -> Duration {
    let minutes = minutes
        .filter(|m| *m > 0)
        .unwrap_or(DEFAULT_EXPIRY_MINUTES)
        .min(MAX_EXPIRY_MINUTES);
    Duration::minutes(minutes)
}

/// Result of writing a folder marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderMarker {
    /// Key of the marker object in the bucket.
    pub object_key: String,
    /// Provider-assigned identifier for the write (ETag or version id), if any.
    pub provider_id: Option<String>,
}

/// Options for a presigned upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresignOptions {
    /// Content type the client must send.
    pub content_type: Option<String>,
    /// Exact byte length the client must send, when positive.
    pub max_size: Option<i64>,
    /// URL lifetime in minutes.
    pub expiry_minutes: Option<i64>,
}

impl PresignOptions {
    /// The content type to sign, falling back to a generic octet stream.
    pub fn content_type(&self) -> &str {
        self.content_type
            .as_deref()
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// The URL lifetime, falling back to 60 minutes.
    pub fn expiry(&self) -> Duration {
        presign_expiry(self.expiry_minutes)
    }

    /// The signed content length, if one should be pinned.
    pub fn content_length(&self) -> Option<i64> {
        self.max_size.filter(|s| *s > 0)
    }
}

/// A time-boxed, PUT-scoped upload URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignedUpload {
    /// The URL the client uploads to.
    pub url: String,
    /// Object key the URL writes.
    pub key: String,
    /// HTTP method the URL is signed for.
    pub method: String,
    /// When the URL stops working.
    pub expires_at: DateTime<Utc>,
}

/// Options for a presigned download.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadOptions {
    /// File name the browser should save as.
    pub filename: Option<String>,
    /// URL lifetime in minutes.
    pub expiry_minutes: Option<i64>,
}

impl DownloadOptions {
    /// The URL lifetime, falling back to 60 minutes.
    pub fn expiry(&self) -> Duration {
        presign_expiry(self.expiry_minutes)
    }

    /// `Content-Disposition` value asking the browser to save under `filename`.
    pub fn content_disposition(&self) -> Option<String> {
        self.filename
            .as_deref()
            .filter(|f| !f.is_empty())
            .map(|f| format!("attachment; filename=\"{}\"", f.replace('"', "'")))
    }
}

/// A time-boxed, GET-scoped download URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignedDownload {
    /// The URL the client downloads from.
    pub url: String,
    /// Object key the URL reads.
    pub key: String,
    /// When the URL stops working.
    pub expires_at: DateTime<Utc>,
}

/// Metadata of an object that exists in the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStat {
    /// Object key.
    pub key: String,
    /// Size in bytes.
    pub size: i64,
    /// Entity tag, if reported.
    pub etag: Option<String>,
}

/// Gateway to the object store.
///
/// Every call is a single round trip. Implementations classify provider
/// failures as `Unavailable`, `Unauthorized`, `Conflict`, or `Internal`.
#[async_trait]
pub trait ObjectStoreGateway: Send + Sync + fmt::Debug + 'static {
    /// Return the provider type name (e.g., "s3", "memory").
    fn provider_type(&self) -> &str;

    /// Write the zero-byte marker object for a folder path.
    ///
    /// Idempotent: writing the same path twice yields the same key.
    async fn create_folder_marker(&self, full_path: &str) -> AppResult<FolderMarker>;

    /// Issue a presigned PUT URL for a file path.
    async fn create_presigned_upload(
        &self,
        full_path: &str,
        options: &PresignOptions,
    ) -> AppResult<PresignedUpload>;

    /// Issue a presigned GET URL for an existing object key.
    async fn create_presigned_download(
        &self,
        key: &str,
        options: &DownloadOptions,
    ) -> AppResult<PresignedDownload>;

    /// Delete an object by key. Deleting an absent key succeeds.
    async fn delete_object(&self, key: &str) -> AppResult<()>;

    /// Look up an object by key; `None` when it does not exist.
    async fn stat_object(&self, key: &str) -> AppResult<Option<ObjectStat>>;
}
