//! Application state shared across all handlers.

use std::sync::Arc;

use dirhub_core::config::AppConfig;
use dirhub_core::traits::storage::ObjectStoreGateway;
use dirhub_database::MetadataStores;
use dirhub_service::{FileService, FolderService, UploadPolicy};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Metadata stores (and the pool, for health checks)
    pub stores: MetadataStores,
    /// Folder service
    pub folder_service: Arc<FolderService>,
    /// File service
    pub file_service: Arc<FileService>,
}

impl AppState {
    /// Wire the services over the given stores and gateway.
    pub fn new(
        config: AppConfig,
        stores: MetadataStores,
        objects: Arc<dyn ObjectStoreGateway>,
    ) -> Self {
        let folder_service = Arc::new(FolderService::new(
            Arc::clone(&stores.folders),
            Arc::clone(&objects),
        ));
        let file_service = Arc::new(FileService::new(
            Arc::clone(&stores.files),
            Arc::clone(&stores.folders),
            objects,
            UploadPolicy::from(&config.storage),
        ));

        Self {
            config: Arc::new(config),
            stores,
            folder_service,
            file_service,
        }
    }
}
