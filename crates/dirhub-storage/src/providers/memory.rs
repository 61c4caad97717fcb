//! Process-local object store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use dirhub_core::config::MarkerStyle;
use dirhub_core::path::PathResolver;
use dirhub_core::result::AppResult;
use dirhub_core::traits::storage::{
    DownloadOptions, FolderMarker, ObjectStat, ObjectStoreGateway, PresignOptions,
    PresignedDownload, PresignedUpload,
};

/// Object store that keeps object sizes in a map.
///
/// Presigned URLs use the `memory://` scheme and cannot be uploaded to;
/// call [`MemoryObjectStore::put`] to stand in for a client upload.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, i64>>>,
    marker_style: MarkerStyle,
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new(marker_style: MarkerStyle) -> Self {
        Self {
            objects: Arc::default(),
            marker_style,
        }
    }

    /// Store an object of the given size.
    pub async fn put(&self, key: &str, size: i64) {
        self.objects.write().await.insert(key.to_string(), size);
    }

    /// Whether an object exists under `key`.
    pub async fn contains(&self, key: &str) -> bool {
        self.objects.read().await.contains_key(key)
    }

    /// All keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStoreGateway for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn create_folder_marker(&self, full_path: &str) -> AppResult<FolderMarker> {
        let key = PathResolver::marker_key(full_path, self.marker_style);
        self.put(&key, 0).await;
        Ok(FolderMarker {
            object_key: key,
            provider_id: None,
        })
    }

    async fn create_presigned_upload(
        &self,
        full_path: &str,
        options: &PresignOptions,
    ) -> AppResult<PresignedUpload> {
        let key = PathResolver::object_key(full_path);
        let expires_at = Utc::now() + options.expiry();
        Ok(PresignedUpload {
            url: format!("memory://{key}?expires={}", expires_at.timestamp()),
            key,
            method: "PUT".to_string(),
            expires_at,
        })
    }

    async fn create_presigned_download(
        &self,
        key: &str,
        options: &DownloadOptions,
    ) -> AppResult<PresignedDownload> {
        let expires_at = Utc::now() + options.expiry();
        Ok(PresignedDownload {
            url: format!("memory://{key}?expires={}", expires_at.timestamp()),
            key: key.to_string(),
            expires_at,
        })
    }

    async fn delete_object(&self, key: &str) -> AppResult<()> {
        self.objects.write().await.remove(key);
        Ok(())
    }

    async fn stat_object(&self, key: &str) -> AppResult<Option<ObjectStat>> {
        Ok(self.objects.read().await.get(key).map(|size| ObjectStat {
            key: key.to_string(),
            size: *size,
            etag: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_marker_is_idempotent() {
        let store = MemoryObjectStore::new(MarkerStyle::TrailingSlash);
        let first = store.create_folder_marker("/docs/2024").await.unwrap();
        let second = store.create_folder_marker("/docs/2024").await.unwrap();
        assert_eq!(first.object_key, "docs/2024/");
        assert_eq!(first, second);
        assert_eq!(store.keys().await, ["docs/2024/"]);
    }

    #[tokio::test]
    async fn test_keep_file_markers() {
        let store = MemoryObjectStore::new(MarkerStyle::KeepFile);
        let marker = store.create_folder_marker("/docs").await.unwrap();
        assert_eq!(marker.object_key, "docs/.keep");
    }

    #[tokio::test]
    async fn test_presign_does_not_create_object() {
        let store = MemoryObjectStore::default();
        let upload = store
            .create_presigned_upload("/docs/a.txt", &PresignOptions::default())
            .await
            .unwrap();
        assert_eq!(upload.key, "docs/a.txt");
        assert!(!store.contains("docs/a.txt").await);
        assert!(store.stat_object("docs/a.txt").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_download_url_scoped_to_key() {
        let store = MemoryObjectStore::default();
        let download = store
            .create_presigned_download("docs/a.txt", &DownloadOptions::default())
            .await
            .unwrap();
        assert_eq!(download.key, "docs/a.txt");
        assert!(download.url.starts_with("memory://docs/a.txt?expires="));
        assert!(download.expires_at > Utc::now());
    }

    #[tokio::test]
    async fn test_stat_and_delete() {
        let store = MemoryObjectStore::default();
        store.put("docs/a.txt", 12).await;
        let stat = store.stat_object("docs/a.txt").await.unwrap().unwrap();
        assert_eq!(stat.size, 12);

        store.delete_object("docs/a.txt").await.unwrap();
        store.delete_object("docs/a.txt").await.unwrap();
        assert!(!store.contains("docs/a.txt").await);
    }
}
