//! File registration and upload confirmation.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use dirhub_core::config::StorageConfig;
use dirhub_core::error::{AppError, CreateStep, ErrorKind};
use dirhub_core::path::PathResolver;
use dirhub_core::result::AppResult;
use dirhub_core::traits::storage::{
    DownloadOptions, ObjectStoreGateway, PresignOptions, PresignedDownload,
};
use dirhub_core::types::{FileId, FolderId, UserId};
use dirhub_database::{FileStore, FolderStore};
use dirhub_entity::file::{File, UploadStatus};

/// Longest accepted MIME type, in bytes.
pub const MAX_MIME_TYPE_LEN: usize = 255;

/// Request to register a file and obtain its upload URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFileRequest {
    /// File name; becomes the last path segment.
    pub name: String,
    /// Containing folder.
    pub folder_id: FolderId,
    /// Declared size in bytes.
    pub size: Option<i64>,
    /// Declared MIME type.
    pub mime_type: Option<String>,
    /// The user registering the file.
    pub uploaded_by: UserId,
}

/// Limits applied to new uploads.
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    /// Presigned URL lifetime in minutes.
    pub expiry_minutes: i64,
    /// Largest declared size accepted.
    pub max_size_bytes: u64,
}

impl From<&StorageConfig> for UploadPolicy {
    fn from(config: &StorageConfig) -> Self {
        Self {
            expiry_minutes: config.presign_expiry_minutes,
            max_size_bytes: config.max_upload_size_bytes,
        }
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::from(&StorageConfig::default())
    }
}

/// Registers files and tracks whether their bytes arrived.
#[derive(Debug, Clone)]
pub struct FileService {
    /// File rows.
    pub(super) files: Arc<dyn FileStore>,
    /// Folder rows (for parent lookups).
    folders: Arc<dyn FolderStore>,
    /// Upload URLs and object checks.
    objects: Arc<dyn ObjectStoreGateway>,
    /// Upload limits.
    policy: UploadPolicy,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        files: Arc<dyn FileStore>,
        folders: Arc<dyn FolderStore>,
        objects: Arc<dyn ObjectStoreGateway>,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            files,
            folders,
            objects,
            policy,
        }
    }

    /// Register a file in a folder and return it with a one-time upload URL.
    ///
    /// The row starts `Pending`; no bytes exist until the client uploads.
    pub async fn create(&self, req: CreateFileRequest) -> AppResult<File> {
        let name = PathResolver::validate_file_name(&req.name)?;
        if req.folder_id.is_nil() {
            return Err(AppError::validation("A containing folder is required"));
        }
        if let Some(size) = req.size {
            if size < 0 {
                return Err(AppError::validation("Size cannot be negative"));
            }
            if size as u64 > self.policy.max_size_bytes {
                return Err(AppError::validation(format!(
                    "Size exceeds the {} byte upload limit",
                    self.policy.max_size_bytes
                )));
            }
        }
        let mime_type = req
            .mime_type
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        if mime_type.as_ref().is_some_and(|m| m.len() > MAX_MIME_TYPE_LEN) {
            return Err(AppError::validation(format!(
                "MIME type exceeds {MAX_MIME_TYPE_LEN} bytes"
            )));
        }

        let folder = self
            .folders
            .get_by_id(&req.folder_id)
            .await
            .map_err(|e| match e.kind {
                ErrorKind::NotFound => AppError::invalid_parent(format!(
                    "Folder {} does not exist",
                    req.folder_id
                )),
                _ => e,
            })
            .map_err(|e| e.at_step(CreateStep::ParentLookup))?;

        let full_path = PathResolver::resolve(Some(&folder.full_path), &name);
        let options = PresignOptions {
            content_type: mime_type.clone(),
            max_size: req.size,
            expiry_minutes: Some(self.policy.expiry_minutes),
        };
        let upload = self
            .objects
            .create_presigned_upload(&full_path, &options)
            .await
            .map_err(|e| e.at_step(CreateStep::ObjectStore))?;

        let now = Utc::now();
        let file = File {
            id: FileId::new(),
            name,
            folder_id: folder.id,
            full_path,
            object_key: upload.key,
            size: req.size,
            mime_type,
            uploaded_by: req.uploaded_by,
            status: UploadStatus::Pending,
            upload_expires_at: Some(upload.expires_at),
            upload_url: None,
            created_at: now,
            updated_at: now,
        };

        let mut stored = self
            .files
            .create(&file)
            .await
            .map_err(|e| e.at_step(CreateStep::Metadata))?;

        info!(
            file_id = %stored.id,
            path = %stored.full_path,
            expires_at = %upload.expires_at,
            "File registered, awaiting upload"
        );

        stored.upload_url = Some(upload.url);
        Ok(stored)
    }

    /// A file by id.
    pub async fn get_by_id(&self, id: &FileId) -> AppResult<File> {
        self.files.get_by_id(id).await
    }

    /// A time-limited download URL for a file whose bytes have arrived.
    ///
    /// Files that are still `Pending` or have `Failed` have nothing to read.
    pub async fn download_url(&self, id: &FileId) -> AppResult<PresignedDownload> {
        let file = self.files.get_by_id(id).await?;
        if file.status != UploadStatus::Uploaded {
            return Err(AppError::validation(format!(
                "File {id} is {} and cannot be downloaded",
                file.status.as_str()
            )));
        }

        let options = DownloadOptions {
            filename: Some(file.name.clone()),
            expiry_minutes: Some(self.policy.expiry_minutes),
        };
        let download = self
            .objects
            .create_presigned_download(&file.object_key, &options)
            .await?;
        debug!(file_id = %file.id, expires_at = %download.expires_at, "Download URL issued");
        Ok(download)
    }

    /// Files directly inside a folder.
    pub async fn get_files(&self, folder_id: &FolderId) -> AppResult<Vec<File>> {
        self.files.find_by_folder(folder_id).await
    }

    /// Check the object store for a file's bytes and update its status.
    ///
    /// Present objects mark the file `Uploaded` with the observed size. An
    /// absent object fails the file only once its upload window has closed.
    /// Files already `Uploaded` or `Failed` are returned unchanged.
    pub async fn confirm_upload(&self, id: &FileId) -> AppResult<File> {
        let file = self.files.get_by_id(id).await?;
        if file.status.is_terminal() {
            return Ok(file);
        }
        self.settle(file).await
    }

    /// Resolve one pending file against the object store.
    pub(super) async fn settle(&self, file: File) -> AppResult<File> {
        match self.objects.stat_object(&file.object_key).await? {
            Some(stat) => {
                let updated = self
                    .files
                    .update_status(&file.id, UploadStatus::Uploaded, Some(stat.size))
                    .await?;
                info!(file_id = %file.id, size = stat.size, "Upload confirmed");
                Ok(updated)
            }
            None if file.upload_window_closed(Utc::now()) => {
                let updated = self
                    .files
                    .update_status(&file.id, UploadStatus::Failed, None)
                    .await?;
                info!(file_id = %file.id, "Upload window closed without an object");
                Ok(updated)
            }
            None => {
                debug!(file_id = %file.id, status = file.status.as_str(), "Object not uploaded yet");
                Ok(file)
            }
        }
    }
}
