//! Folder creation across both stores, plus read-through queries.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use dirhub_core::error::{AppError, CreateStep, ErrorKind};
use dirhub_core::path::PathResolver;
use dirhub_core::result::AppResult;
use dirhub_core::traits::storage::ObjectStoreGateway;
use dirhub_core::types::{FolderId, UserId};
use dirhub_database::FolderStore;
use dirhub_entity::folder::Folder;

/// Creates folders in the object store and the metadata store.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Folder rows.
    folders: Arc<dyn FolderStore>,
    /// Marker objects.
    objects: Arc<dyn ObjectStoreGateway>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(folders: Arc<dyn FolderStore>, objects: Arc<dyn ObjectStoreGateway>) -> Self {
        Self { folders, objects }
    }

    /// Create a folder named `name` under `parent_id`, or at the root.
    ///
    /// The marker is written before the row. If the row cannot be written the
    /// marker is deleted again, unless a committed folder already owns the
    /// same path and therefore the same marker.
    pub async fn create(
        &self,
        name: &str,
        parent_id: Option<FolderId>,
        owner_id: UserId,
    ) -> AppResult<Folder> {
        let name = PathResolver::validate_segment(name)?;

        let parent = match parent_id {
            Some(id) => Some(self.lookup_parent(&id).await?),
            None => None,
        };

        let id = FolderId::new();
        let full_path = PathResolver::resolve(parent.as_ref().map(|p| p.full_path.as_str()), &name);

        let marker = self
            .objects
            .create_folder_marker(&full_path)
            .await
            .map_err(|e| e.at_step(CreateStep::ObjectStore))?;

        let now = Utc::now();
        let folder = Folder {
            id,
            name,
            parent_id,
            owner_id,
            full_path,
            created_at: now,
            updated_at: now,
        };

        match self.folders.create(&folder).await {
            Ok(stored) => {
                info!(
                    folder_id = %stored.id,
                    path = %stored.full_path,
                    marker = %marker.object_key,
                    owner_id = %owner_id,
                    "Folder created"
                );
                Ok(stored)
            }
            Err(e) => {
                if self.marker_is_unowned(&folder.full_path, &e).await {
                    self.remove_marker(&marker.object_key, &e).await;
                }
                Err(e.at_step(CreateStep::Metadata))
            }
        }
    }

    /// Every folder, ordered by path.
    pub async fn get_all(&self) -> AppResult<Vec<Folder>> {
        self.folders.find_all().await
    }

    /// A folder by id.
    pub async fn get_by_id(&self, id: &FolderId) -> AppResult<Folder> {
        self.folders.get_by_id(id).await
    }

    /// Direct children of a folder.
    pub async fn get_sub_folders(&self, parent_id: &FolderId) -> AppResult<Vec<Folder>> {
        self.folders.find_children(parent_id).await
    }

    async fn lookup_parent(&self, parent_id: &FolderId) -> AppResult<Folder> {
        self.folders
            .get_by_id(parent_id)
            .await
            .map_err(|e| match e.kind {
                ErrorKind::NotFound => {
                    AppError::invalid_parent(format!("Parent folder {parent_id} does not exist"))
                }
                _ => e,
            })
            .map_err(|e| e.at_step(CreateStep::ParentLookup))
    }

    /// Whether no committed folder resolves to `full_path`.
    ///
    /// Markers are keyed by path, so a folder created earlier under the same
    /// path shares the marker. A sibling clash always has an owner; otherwise
    /// the metadata store decides, and a failed lookup keeps the marker.
    async fn marker_is_unowned(&self, full_path: &str, cause: &AppError) -> bool {
        if cause.kind == ErrorKind::Conflict {
            return false;
        }
        match self.folders.find_by_path(full_path).await {
            Ok(None) => true,
            Ok(Some(owner)) => {
                info!(
                    folder_id = %owner.id,
                    path = %full_path,
                    "Keeping folder marker owned by an existing folder"
                );
                false
            }
            Err(e) => {
                warn!(
                    path = %full_path,
                    error = %e,
                    "Could not check marker ownership; keeping marker"
                );
                false
            }
        }
    }

    async fn remove_marker(&self, key: &str, cause: &AppError) {
        match self.objects.delete_object(key).await {
            Ok(()) => info!(
                marker = %key,
                error = %cause,
                "Removed folder marker after metadata failure"
            ),
            Err(e) => warn!(
                marker = %key,
                error = %e,
                cause = %cause,
                "Failed to remove folder marker; marker is orphaned"
            ),
        }
    }
}
