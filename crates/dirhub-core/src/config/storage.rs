//! Object storage configuration.

use serde::{Deserialize, Serialize};

/// Which object store backs the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderKind {
    /// An S3-compatible endpoint.
    #[default]
    S3,
    /// Process-local object map.
    Memory,
}

impl StorageProviderKind {
    /// The provider name as written in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S3 => "s3",
            Self::Memory => "memory",
        }
    }
}

/// How a folder marker object is keyed in the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStyle {
    /// `docs/2024/`
    #[default]
    TrailingSlash,
    /// `docs/2024/.keep`
    KeepFile,
}

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Object store provider.
    #[serde(default)]
    pub provider: StorageProviderKind,
    /// Bucket holding folder markers and uploaded files.
    #[serde(default)]
    pub bucket: String,
    /// Client-side timeout for a single object-store request, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Lifetime of presigned upload URLs, in minutes.
    #[serde(default = "default_presign_expiry")]
    pub presign_expiry_minutes: i64,
    /// Largest declared file size accepted at creation time (default 5 GB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Folder marker key style.
    #[serde(default)]
    pub marker_style: MarkerStyle,
    /// Retry policy for object-store calls.
    #[serde(default)]
    pub retry: RetryConfig,
    /// S3-compatible endpoint settings.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProviderKind::default(),
            bucket: String::new(),
            request_timeout_seconds: default_request_timeout(),
            presign_expiry_minutes: default_presign_expiry(),
            max_upload_size_bytes: default_max_upload(),
            marker_style: MarkerStyle::default(),
            retry: RetryConfig::default(),
            s3: S3StorageConfig::default(),
        }
    }
}

/// Bounded retry for object-store calls.
///
/// Only `Unavailable` failures are retried. One attempt means no retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per call, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent retry.
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff(),
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// Endpoint URL (for non-AWS services like MinIO or R2). Empty uses AWS.
    #[serde(default)]
    pub endpoint: String,
    /// Region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Access key ID. Empty falls back to the default credential chain.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Address buckets by path rather than virtual host.
    #[serde(default = "default_true")]
    pub force_path_style: bool,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            access_key: String::new(),
            secret_key: String::new(),
            force_path_style: true,
        }
    }
}

fn default_request_timeout() -> u64 {
    60
}

fn default_presign_expiry() -> i64 {
    60
}

fn default_max_upload() -> u64 {
    5_368_709_120 // 5 GB
}

fn default_max_attempts() -> u32 {
    1
}

fn default_initial_backoff() -> u64 {
    200
}

fn default_region() -> String {
    "auto".to_string()
}

fn default_true() -> bool {
    true
}
