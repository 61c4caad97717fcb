//! Construction of the metadata stores selected by configuration.

use std::sync::Arc;

use tracing::info;

use dirhub_core::config::{DatabaseConfig, DatabaseDriver};
use dirhub_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryDatabase;
use crate::repositories::{FileRepository, FileStore, FolderRepository, FolderStore};

/// The folder and file stores handed to the services.
#[derive(Debug, Clone)]
pub struct MetadataStores {
    /// Folder rows.
    pub folders: Arc<dyn FolderStore>,
    /// File rows.
    pub files: Arc<dyn FileStore>,
    /// The PostgreSQL pool, when the postgres driver is in use.
    pub pool: Option<DatabasePool>,
}

impl MetadataStores {
    /// Open the configured driver.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.driver {
            DatabaseDriver::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                Ok(Self::postgres(pool))
            }
            DatabaseDriver::Memory => {
                info!("Using in-memory metadata store");
                Ok(Self::memory(&MemoryDatabase::new()))
            }
        }
    }

    /// Stores backed by an open PostgreSQL pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        Self {
            folders: Arc::new(FolderRepository::new(pool.pool().clone())),
            files: Arc::new(FileRepository::new(pool.pool().clone())),
            pool: Some(pool),
        }
    }

    /// Stores backed by a process-local database.
    pub fn memory(db: &MemoryDatabase) -> Self {
        Self {
            folders: Arc::new(db.folders()),
            files: Arc::new(db.files()),
            pool: None,
        }
    }

    /// Check connectivity; always healthy for the memory driver.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_driver_connects_without_url() {
        let config = DatabaseConfig {
            driver: DatabaseDriver::Memory,
            ..Default::default()
        };
        let stores = MetadataStores::connect(&config).await.unwrap();
        assert!(stores.pool.is_none());
        assert!(stores.health_check().await.unwrap());
        assert!(stores.folders.find_all().await.unwrap().is_empty());
    }
}
