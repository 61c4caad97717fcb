//! Builds the object store gateway selected by configuration.

use std::sync::Arc;

use tracing::info;

use dirhub_core::config::{StorageConfig, StorageProviderKind};
use dirhub_core::result::AppResult;
use dirhub_core::traits::storage::ObjectStoreGateway;

use crate::providers::memory::MemoryObjectStore;
use crate::retry::RetryingObjectStore;

/// Construct the configured gateway, wrapped in the retry policy when it
/// allows more than one attempt.
pub async fn build_object_store(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStoreGateway>> {
    let gateway: Arc<dyn ObjectStoreGateway> = match config.provider {
        StorageProviderKind::S3 => connect_s3(config).await?,
        StorageProviderKind::Memory => {
            info!("Using in-memory object store");
            Arc::new(MemoryObjectStore::new(config.marker_style))
        }
    };

    if config.retry.max_attempts > 1 {
        info!(
            max_attempts = config.retry.max_attempts,
            initial_backoff_ms = config.retry.initial_backoff_ms,
            "Object store retries enabled"
        );
        return Ok(Arc::new(RetryingObjectStore::new(
            gateway,
            config.retry.clone(),
        )));
    }

    Ok(gateway)
}

#[cfg(feature = "s3")]
async fn connect_s3(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStoreGateway>> {
    let store = crate::providers::s3::S3ObjectStore::new(config).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "s3"))]
async fn connect_s3(_config: &StorageConfig) -> AppResult<Arc<dyn ObjectStoreGateway>> {
    Err(dirhub_core::error::AppError::configuration(
        "The s3 provider requires the `s3` feature",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirhub_core::config::RetryConfig;

    #[tokio::test]
    async fn test_memory_provider() {
        let config = StorageConfig {
            provider: StorageProviderKind::Memory,
            ..Default::default()
        };
        let store = build_object_store(&config).await.unwrap();
        assert_eq!(store.provider_type(), "memory");
        let marker = store.create_folder_marker("/docs").await.unwrap();
        assert_eq!(marker.object_key, "docs/");
    }

    #[tokio::test]
    async fn test_retry_wrapper_keeps_provider_type() {
        let config = StorageConfig {
            provider: StorageProviderKind::Memory,
            retry: RetryConfig {
                max_attempts: 3,
                initial_backoff_ms: 5,
            },
            ..Default::default()
        };
        let store = build_object_store(&config).await.unwrap();
        assert_eq!(store.provider_type(), "memory");
    }
}
