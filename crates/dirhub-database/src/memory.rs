//! In-memory metadata store.
//!
//! Both repositories share one state so that file rows can check their
//! folder reference. Uniqueness and reference rules match the PostgreSQL
//! schema: sibling folder names are unique, file names are unique per
//! folder, and a row pointing at a missing folder is `InvalidParent`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use dirhub_core::error::AppError;
use dirhub_core::result::AppResult;
use dirhub_core::traits::Repository;
use dirhub_core::types::{FileId, FolderId};
use dirhub_entity::file::{File, UploadStatus};
use dirhub_entity::folder::Folder;

use crate::repositories::{FileStore, FolderStore};

#[derive(Debug, Default)]
struct MemoryState {
    folders: HashMap<FolderId, Folder>,
    files: HashMap<FileId, File>,
}

/// Process-local metadata store; contents are lost when the last handle drops.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryDatabase {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folder repository over this store.
    pub fn folders(&self) -> MemoryFolderStore {
        MemoryFolderStore {
            state: Arc::clone(&self.state),
        }
    }

    /// File repository over this store.
    pub fn files(&self) -> MemoryFileStore {
        MemoryFileStore {
            state: Arc::clone(&self.state),
        }
    }
}

/// Folder repository backed by [`MemoryDatabase`].
#[derive(Debug, Clone)]
pub struct MemoryFolderStore {
    state: Arc<RwLock<MemoryState>>,
}

#[async_trait]
impl Repository<Folder, FolderId> for MemoryFolderStore {
    async fn find_by_id(&self, id: &FolderId) -> AppResult<Option<Folder>> {
        Ok(self.state.read().await.folders.get(id).cloned())
    }

    async fn create(&self, folder: &Folder) -> AppResult<Folder> {
        let mut state = self.state.write().await;

        if state.folders.contains_key(&folder.id) {
            return Err(AppError::conflict(format!(
                "Folder {} already exists",
                folder.id
            )));
        }
        if let Some(parent_id) = &folder.parent_id {
            if !state.folders.contains_key(parent_id) {
                return Err(AppError::invalid_parent(format!(
                    "Parent folder {parent_id} does not exist"
                )));
            }
        }
        let clash = state
            .folders
            .values()
            .any(|f| f.parent_id == folder.parent_id && f.name == folder.name);
        if clash {
            return Err(AppError::conflict(format!(
                "A folder named '{}' already exists here",
                folder.name
            )));
        }

        state.folders.insert(folder.id, folder.clone());
        Ok(folder.clone())
    }
}

#[async_trait]
impl FolderStore for MemoryFolderStore {
    async fn find_all(&self) -> AppResult<Vec<Folder>> {
        let state = self.state.read().await;
        let mut folders: Vec<Folder> = state.folders.values().cloned().collect();
        folders.sort_by(|a, b| a.full_path.cmp(&b.full_path));
        Ok(folders)
    }

    async fn find_children(&self, parent_id: &FolderId) -> AppResult<Vec<Folder>> {
        let state = self.state.read().await;
        let mut children: Vec<Folder> = state
            .folders
            .values()
            .filter(|f| f.parent_id.as_ref() == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    async fn find_by_path(&self, full_path: &str) -> AppResult<Option<Folder>> {
        let state = self.state.read().await;
        Ok(state
            .folders
            .values()
            .find(|f| f.full_path == full_path)
            .cloned())
    }
}

/// File repository backed by [`MemoryDatabase`].
#[derive(Debug, Clone)]
pub struct MemoryFileStore {
    state: Arc<RwLock<MemoryState>>,
}

#[async_trait]
impl Repository<File, FileId> for MemoryFileStore {
    async fn find_by_id(&self, id: &FileId) -> AppResult<Option<File>> {
        Ok(self.state.read().await.files.get(id).cloned())
    }

    async fn create(&self, file: &File) -> AppResult<File> {
        let mut state = self.state.write().await;

        if state.files.contains_key(&file.id) {
            return Err(AppError::conflict(format!("File {} already exists", file.id)));
        }
        if !state.folders.contains_key(&file.folder_id) {
            return Err(AppError::invalid_parent(format!(
                "Folder {} does not exist",
                file.folder_id
            )));
        }
        let clash = state
            .files
            .values()
            .any(|f| f.folder_id == file.folder_id && f.name == file.name);
        if clash {
            return Err(AppError::conflict(format!(
                "A file named '{}' already exists in this folder",
                file.name
            )));
        }

        let mut stored = file.clone();
        stored.upload_url = None;
        state.files.insert(stored.id, stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn find_by_folder(&self, folder_id: &FolderId) -> AppResult<Vec<File>> {
        let state = self.state.read().await;
        let mut files: Vec<File> = state
            .files
            .values()
            .filter(|f| &f.folder_id == folder_id)
            .cloned()
            .collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    async fn update_status(
        &self,
        id: &FileId,
        status: UploadStatus,
        size: Option<i64>,
    ) -> AppResult<File> {
        let mut state = self.state.write().await;
        let file = state
            .files
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        file.status = status;
        if size.is_some() {
            file.size = size;
        }
        file.updated_at = Utc::now();
        Ok(file.clone())
    }

    async fn find_pending_expired(&self, now: DateTime<Utc>, limit: i64) -> AppResult<Vec<File>> {
        let state = self.state.read().await;
        let mut expired: Vec<File> = state
            .files
            .values()
            .filter(|f| f.status == UploadStatus::Pending && f.upload_window_closed(now))
            .cloned()
            .collect();
        expired.sort_by_key(|f| f.upload_expires_at);
        expired.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        Ok(expired)
    }
}
