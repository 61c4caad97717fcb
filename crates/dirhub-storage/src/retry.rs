//! Bounded retry around any object store gateway.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use dirhub_core::config::RetryConfig;
use dirhub_core::error::ErrorKind;
use dirhub_core::result::AppResult;
use dirhub_core::traits::storage::{
    DownloadOptions, FolderMarker, ObjectStat, ObjectStoreGateway, PresignOptions,
    PresignedDownload, PresignedUpload,
};

/// Retries `Unavailable` failures with exponential backoff.
///
/// Every other error kind is returned on the first attempt.
#[derive(Debug, Clone)]
pub struct RetryingObjectStore {
    inner: Arc<dyn ObjectStoreGateway>,
    policy: RetryConfig,
}

impl RetryingObjectStore {
    /// Wrap a gateway with a retry policy.
    pub fn new(inner: Arc<dyn ObjectStoreGateway>, policy: RetryConfig) -> Self {
        Self { inner, policy }
    }

    async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> AppResult<T>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = AppResult<T>> + Send,
        T: Send,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut backoff = Duration::from_millis(self.policy.initial_backoff_ms);
        let mut attempt = 1;

        loop {
            match call().await {
                Err(e) if e.kind == ErrorKind::Unavailable && attempt < max_attempts => {
                    warn!(
                        operation,
                        attempt,
                        max = max_attempts,
                        error = %e,
                        "Object store unavailable, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[async_trait]
impl ObjectStoreGateway for RetryingObjectStore {
    fn provider_type(&self) -> &str {
        self.inner.provider_type()
    }

    async fn create_folder_marker(&self, full_path: &str) -> AppResult<FolderMarker> {
        self.run("create_folder_marker", move || {
            self.inner.create_folder_marker(full_path)
        })
        .await
    }

    async fn create_presigned_upload(
        &self,
        full_path: &str,
        options: &PresignOptions,
    ) -> AppResult<PresignedUpload> {
        self.run("create_presigned_upload", move || {
            self.inner.create_presigned_upload(full_path, options)
        })
        .await
    }

    async fn create_presigned_download(
        &self,
        key: &str,
        options: &DownloadOptions,
    ) -> AppResult<PresignedDownload> {
        self.run("create_presigned_download", move || {
            self.inner.create_presigned_download(key, options)
        })
        .await
    }

    async fn delete_object(&self, key: &str) -> AppResult<()> {
        self.run("delete_object", move || self.inner.delete_object(key))
            .await
    }

    async fn stat_object(&self, key: &str) -> AppResult<Option<ObjectStat>> {
        self.run("stat_object", move || self.inner.stat_object(key)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use dirhub_core::error::AppError;

    use super::*;

    /// Fails the first `failures` marker writes with the given kind.
    #[derive(Debug)]
    struct Flaky {
        failures: u32,
        kind: ErrorKind,
        calls: AtomicU32,
    }

    impl Flaky {
        fn new(failures: u32, kind: ErrorKind) -> Arc<Self> {
            Arc::new(Self {
                failures,
                kind,
                calls: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl ObjectStoreGateway for Flaky {
        fn provider_type(&self) -> &str {
            "flaky"
        }

        async fn create_folder_marker(&self, full_path: &str) -> AppResult<FolderMarker> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(AppError::new(self.kind, "injected"));
            }
            Ok(FolderMarker {
                object_key: format!("{}/", full_path.trim_start_matches('/')),
                provider_id: None,
            })
        }

        async fn create_presigned_upload(
            &self,
            _full_path: &str,
            _options: &PresignOptions,
        ) -> AppResult<PresignedUpload> {
            Err(AppError::internal("unused"))
        }

        async fn create_presigned_download(
            &self,
            _key: &str,
            _options: &DownloadOptions,
        ) -> AppResult<PresignedDownload> {
            Err(AppError::internal("unused"))
        }

        async fn delete_object(&self, _key: &str) -> AppResult<()> {
            Ok(())
        }

        async fn stat_object(&self, _key: &str) -> AppResult<Option<ObjectStat>> {
            Ok(None)
        }
    }

    fn policy(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_backoff_ms: 10,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_is_retried_until_success() {
        let inner = Flaky::new(2, ErrorKind::Unavailable);
        let store = RetryingObjectStore::new(inner.clone(), policy(3));
        let marker = store.create_folder_marker("/docs").await.unwrap();
        assert_eq!(marker.object_key, "docs/");
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let inner = Flaky::new(5, ErrorKind::Unavailable);
        let store = RetryingObjectStore::new(inner.clone(), policy(3));
        let err = store.create_folder_marker("/docs").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unavailable);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_kinds_fail_fast() {
        let inner = Flaky::new(1, ErrorKind::Unauthorized);
        let store = RetryingObjectStore::new(inner.clone(), policy(3));
        let err = store.create_folder_marker("/docs").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_single_attempt_means_no_retry() {
        let inner = Flaky::new(1, ErrorKind::Unavailable);
        let store = RetryingObjectStore::new(inner.clone(), policy(1));
        assert!(store.create_folder_marker("/docs").await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }
}
