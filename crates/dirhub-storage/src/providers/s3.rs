//! S3-compatible object store gateway.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::timeout::TimeoutConfig;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use chrono::Utc;
use tracing::{debug, info};

use dirhub_core::config::{MarkerStyle, StorageConfig};
use dirhub_core::error::{AppError, ErrorKind};
use dirhub_core::path::PathResolver;
use dirhub_core::result::AppResult;
use dirhub_core::traits::storage::{
    DownloadOptions, FolderMarker, ObjectStat, ObjectStoreGateway, PresignOptions,
    PresignedDownload, PresignedUpload,
};

/// S3 error codes that mean the service's credentials were rejected.
const AUTH_CODES: &[&str] = &[
    "AccessDenied",
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "ExpiredToken",
    "InvalidToken",
];

/// S3 error codes that mean the provider is temporarily failing.
const THROTTLE_CODES: &[&str] = &[
    "SlowDown",
    "ServiceUnavailable",
    "InternalError",
    "RequestTimeout",
    "RequestTimeTooSkewed",
];

/// S3 error codes for conflicting concurrent writes.
const CONFLICT_CODES: &[&str] = &[
    "OperationAborted",
    "ConditionalRequestConflict",
    "PreconditionFailed",
];

/// Where in the SDK pipeline a request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureStage {
    /// The request could not be built (bad input or config).
    Construction,
    /// The client-side timeout elapsed.
    Timeout,
    /// The request never reached the provider (DNS, TLS, connection).
    Dispatch,
    /// The provider answered with something unparseable.
    Response,
    /// The provider answered with a modeled error.
    Service,
}

/// Classify a failed S3 call from the SDK stage, HTTP status, and error code.
pub(crate) fn classify_failure(
    stage: FailureStage,
    status: Option<u16>,
    code: Option<&str>,
) -> ErrorKind {
    match stage {
        FailureStage::Timeout | FailureStage::Dispatch => return ErrorKind::Unavailable,
        FailureStage::Construction => return ErrorKind::Internal,
        FailureStage::Response | FailureStage::Service => {}
    }

    if let Some(code) = code {
        if AUTH_CODES.contains(&code) {
            return ErrorKind::Unauthorized;
        }
        if THROTTLE_CODES.contains(&code) {
            return ErrorKind::Unavailable;
        }
        if CONFLICT_CODES.contains(&code) {
            return ErrorKind::Conflict;
        }
    }

    match status {
        Some(401 | 403) => ErrorKind::Unauthorized,
        Some(409 | 412) => ErrorKind::Conflict,
        Some(429) => ErrorKind::Unavailable,
        Some(s) if s >= 500 => ErrorKind::Unavailable,
        _ => ErrorKind::Internal,
    }
}

/// Convert an SDK error into a classified [`AppError`].
fn map_sdk_error<E>(err: SdkError<E>, context: &str) -> AppError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let stage = match &err {
        SdkError::ConstructionFailure(_) => FailureStage::Construction,
        SdkError::TimeoutError(_) => FailureStage::Timeout,
        SdkError::DispatchFailure(_) => FailureStage::Dispatch,
        SdkError::ResponseError(_) => FailureStage::Response,
        _ => FailureStage::Service,
    };
    let status = err.raw_response().map(|r| r.status().as_u16());
    let kind = classify_failure(stage, status, err.code());
    let message = format!("{context}: {}", DisplayErrorContext(&err));
    AppError::with_source(kind, message, err)
}

/// Presigning settings for a URL lifetime.
fn presigning_config(expiry: chrono::Duration) -> AppResult<PresigningConfig> {
    let expires_in = expiry
        .to_std()
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Invalid presign expiry", e))?;
    PresigningConfig::expires_in(expires_in)
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Invalid presign expiry", e))
}

/// Object store gateway for AWS S3 and S3-compatible services.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    marker_style: MarkerStyle,
}

impl S3ObjectStore {
    /// Build a client from storage configuration.
    ///
    /// Explicit access keys are used when configured; otherwise the default
    /// AWS credential chain is consulted.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let s3 = &config.s3;
        info!(
            endpoint = %s3.endpoint,
            region = %s3.region,
            bucket = %config.bucket,
            "Initializing S3 object store"
        );

        let timeouts = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(config.request_timeout_seconds))
            .build();

        let mut builder = if s3.access_key.is_empty() {
            let shared = aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(s3.region.clone()))
                .load()
                .await;
            aws_sdk_s3::config::Builder::from(&shared)
        } else {
            aws_sdk_s3::Config::builder()
                .behavior_version(BehaviorVersion::latest())
                .region(Region::new(s3.region.clone()))
                .credentials_provider(Credentials::new(
                    s3.access_key.clone(),
                    s3.secret_key.clone(),
                    None,
                    None,
                    "dirhub",
                ))
        };

        builder = builder
            .timeout_config(timeouts)
            .force_path_style(s3.force_path_style);
        if !s3.endpoint.is_empty() {
            builder = builder.endpoint_url(s3.endpoint.clone());
        }

        Ok(Self::from_client(
            Client::from_conf(builder.build()),
            config.bucket.clone(),
            config.marker_style,
        ))
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client, bucket: String, marker_style: MarkerStyle) -> Self {
        Self {
            client,
            bucket,
            marker_style,
        }
    }
}

#[async_trait]
impl ObjectStoreGateway for S3ObjectStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn create_folder_marker(&self, full_path: &str) -> AppResult<FolderMarker> {
        let key = PathResolver::marker_key(full_path, self.marker_style);
        let output = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from_static(b""))
            .content_length(0)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, "Failed to write folder marker"))?;

        debug!(key = %key, "Folder marker written");
        Ok(FolderMarker {
            object_key: key,
            provider_id: output
                .version_id()
                .or_else(|| output.e_tag())
                .map(str::to_string),
        })
    }

    async fn create_presigned_upload(
        &self,
        full_path: &str,
        options: &PresignOptions,
    ) -> AppResult<PresignedUpload> {
        let key = PathResolver::object_key(full_path);
        let expiry = options.expiry();
        let presigning = presigning_config(expiry)?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(options.content_type())
            .set_content_length(options.content_length())
            .presigned(presigning)
            .await
            .map_err(|e| map_sdk_error(e, "Failed to presign upload"))?;

        Ok(PresignedUpload {
            url: request.uri().to_string(),
            key,
            method: request.method().to_string(),
            expires_at: Utc::now() + expiry,
        })
    }

    async fn create_presigned_download(
        &self,
        key: &str,
        options: &DownloadOptions,
    ) -> AppResult<PresignedDownload> {
        let expiry = options.expiry();
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .set_response_content_disposition(options.content_disposition())
            .presigned(presigning_config(expiry)?)
            .await
            .map_err(|e| map_sdk_error(e, "Failed to presign download"))?;

        Ok(PresignedDownload {
            url: request.uri().to_string(),
            key: key.to_string(),
            expires_at: Utc::now() + expiry,
        })
    }

    async fn delete_object(&self, key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, "Failed to delete object"))?;
        debug!(key = %key, "Object deleted");
        Ok(())
    }

    async fn stat_object(&self, key: &str) -> AppResult<Option<ObjectStat>> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => Ok(Some(ObjectStat {
                key: key.to_string(),
                size: output.content_length().unwrap_or(0),
                etag: output.e_tag().map(str::to_string),
            })),
            Err(err) if err.as_service_error().is_some_and(|e| e.is_not_found()) => Ok(None),
            Err(err) => Err(map_sdk_error(err, "Failed to stat object")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> StorageConfig {
        let mut config = StorageConfig::default();
        config.bucket = "dirhub-test".to_string();
        config.s3.endpoint = "http://localhost:9000".to_string();
        config.s3.region = "us-east-1".to_string();
        config.s3.access_key = "minioadmin".to_string();
        config.s3.secret_key = "minioadmin".to_string();
        config
    }

    #[test]
    fn test_transport_failures_are_unavailable() {
        assert_eq!(
            classify_failure(FailureStage::Timeout, None, None),
            ErrorKind::Unavailable
        );
        assert_eq!(
            classify_failure(FailureStage::Dispatch, None, None),
            ErrorKind::Unavailable
        );
        assert_eq!(
            classify_failure(FailureStage::Construction, None, None),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_service_codes_take_precedence() {
        assert_eq!(
            classify_failure(FailureStage::Service, Some(403), Some("SignatureDoesNotMatch")),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            classify_failure(FailureStage::Service, Some(503), Some("SlowDown")),
            ErrorKind::Unavailable
        );
        assert_eq!(
            classify_failure(FailureStage::Service, Some(409), Some("OperationAborted")),
            ErrorKind::Conflict
        );
    }

    #[test]
    fn test_status_fallback() {
        assert_eq!(
            classify_failure(FailureStage::Response, Some(401), None),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            classify_failure(FailureStage::Response, Some(502), None),
            ErrorKind::Unavailable
        );
        assert_eq!(
            classify_failure(FailureStage::Service, Some(404), Some("NoSuchBucket")),
            ErrorKind::Internal
        );
    }

    #[tokio::test]
    async fn test_presign_is_offline_and_scoped_to_put() {
        let store = S3ObjectStore::new(&test_config()).await.unwrap();
        let upload = store
            .create_presigned_upload(
                "/docs/2024/report.pdf",
                &PresignOptions {
                    content_type: Some("application/pdf".to_string()),
                    max_size: Some(1024),
                    expiry_minutes: Some(15),
                },
            )
            .await
            .unwrap();

        assert_eq!(upload.key, "docs/2024/report.pdf");
        assert_eq!(upload.method, "PUT");
        assert!(upload.url.starts_with("http://localhost:9000/dirhub-test/docs/2024/report.pdf"));
        assert!(upload.url.contains("X-Amz-Expires=900"));
        assert!(upload.url.contains("X-Amz-Signature="));
        assert!(upload.expires_at > Utc::now());
    }

    #[tokio::test]
    async fn test_download_presign_is_offline_and_scoped_to_get() {
        let store = S3ObjectStore::new(&test_config()).await.unwrap();
        let download = store
            .create_presigned_download(
                "docs/2024/report.pdf",
                &DownloadOptions {
                    filename: Some("report.pdf".to_string()),
                    expiry_minutes: Some(30),
                },
            )
            .await
            .unwrap();

        assert_eq!(download.key, "docs/2024/report.pdf");
        assert!(download.url.starts_with("http://localhost:9000/dirhub-test/docs/2024/report.pdf"));
        assert!(download.url.contains("X-Amz-Expires=1800"));
        assert!(download.url.contains("response-content-disposition="));
    }
}
