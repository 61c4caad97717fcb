//! Shared doubles for service tests.
//!
//! Both doubles wrap the in-memory backends, count calls, and can be told
//! to fail a given operation with a given error kind.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use dirhub_core::config::MarkerStyle;
use dirhub_core::error::{AppError, ErrorKind};
use dirhub_core::result::AppResult;
use dirhub_core::traits::Repository;
use dirhub_core::traits::storage::{
    DownloadOptions, FolderMarker, ObjectStat, ObjectStoreGateway, PresignOptions,
    PresignedDownload, PresignedUpload,
};
use dirhub_core::types::{FileId, FolderId, UserId};
use dirhub_database::memory::MemoryFolderStore;
use dirhub_database::{FileStore, FolderStore, MemoryDatabase};
use dirhub_entity::file::{File, UploadStatus};
use dirhub_entity::folder::Folder;
use dirhub_service::{FileService, FolderService, UploadPolicy};
use dirhub_storage::MemoryObjectStore;

/// Object store double that counts calls per operation.
#[derive(Debug, Default)]
pub struct CountingObjectStore {
    pub inner: MemoryObjectStore,
    pub marker_calls: AtomicUsize,
    pub presign_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub stat_calls: AtomicUsize,
    pub download_calls: AtomicUsize,
    pub fail_marker: Mutex<Option<ErrorKind>>,
    pub fail_presign: Mutex<Option<ErrorKind>>,
    pub fail_delete: Mutex<Option<ErrorKind>>,
    pub fail_stat: Mutex<Option<ErrorKind>>,
    pub fail_download: Mutex<Option<ErrorKind>>,
    pub last_presign: Mutex<Option<PresignOptions>>,
    pub last_download: Mutex<Option<DownloadOptions>>,
}

impl CountingObjectStore {
    pub fn total_calls(&self) -> usize {
        self.marker_calls.load(Ordering::SeqCst)
            + self.presign_calls.load(Ordering::SeqCst)
            + self.delete_calls.load(Ordering::SeqCst)
            + self.stat_calls.load(Ordering::SeqCst)
            + self.download_calls.load(Ordering::SeqCst)
    }

    pub fn fail_marker_with(&self, kind: ErrorKind) {
        *self.fail_marker.lock().unwrap() = Some(kind);
    }

    pub fn fail_presign_with(&self, kind: ErrorKind) {
        *self.fail_presign.lock().unwrap() = Some(kind);
    }

    pub fn fail_delete_with(&self, kind: ErrorKind) {
        *self.fail_delete.lock().unwrap() = Some(kind);
    }

    pub fn fail_stat_with(&self, kind: ErrorKind) {
        *self.fail_stat.lock().unwrap() = Some(kind);
    }

    pub fn fail_download_with(&self, kind: ErrorKind) {
        *self.fail_download.lock().unwrap() = Some(kind);
    }
}

fn injected(slot: &Mutex<Option<ErrorKind>>) -> AppResult<()> {
    match *slot.lock().unwrap() {
        Some(kind) => Err(AppError::new(kind, "injected failure")),
        None => Ok(()),
    }
}

#[async_trait]
impl ObjectStoreGateway for CountingObjectStore {
    fn provider_type(&self) -> &str {
        "counting"
    }

    async fn create_folder_marker(&self, full_path: &str) -> AppResult<FolderMarker> {
        self.marker_calls.fetch_add(1, Ordering::SeqCst);
        injected(&self.fail_marker)?;
        self.inner.create_folder_marker(full_path).await
    }

    async fn create_presigned_upload(
        &self,
        full_path: &str,
        options: &PresignOptions,
    ) -> AppResult<PresignedUpload> {
        self.presign_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_presign.lock().unwrap() = Some(options.clone());
        injected(&self.fail_presign)?;
        self.inner.create_presigned_upload(full_path, options).await
    }

    async fn create_presigned_download(
        &self,
        key: &str,
        options: &DownloadOptions,
    ) -> AppResult<PresignedDownload> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_download.lock().unwrap() = Some(options.clone());
        injected(&self.fail_download)?;
        self.inner.create_presigned_download(key, options).await
    }

    async fn delete_object(&self, key: &str) -> AppResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        injected(&self.fail_delete)?;
        self.inner.delete_object(key).await
    }

    async fn stat_object(&self, key: &str) -> AppResult<Option<ObjectStat>> {
        self.stat_calls.fetch_add(1, Ordering::SeqCst);
        injected(&self.fail_stat)?;
        self.inner.stat_object(key).await
    }
}

/// Folder store spy that counts `create` calls.
#[derive(Debug)]
pub struct CountingFolderStore {
    pub inner: MemoryFolderStore,
    pub creates: AtomicUsize,
    pub fail_create: Mutex<Option<ErrorKind>>,
    pub fail_find_by_path: Mutex<Option<ErrorKind>>,
}

impl CountingFolderStore {
    pub fn fail_create_with(&self, kind: ErrorKind) {
        *self.fail_create.lock().unwrap() = Some(kind);
    }

    pub fn fail_find_by_path_with(&self, kind: ErrorKind) {
        *self.fail_find_by_path.lock().unwrap() = Some(kind);
    }
}

#[async_trait]
impl Repository<Folder, FolderId> for CountingFolderStore {
    async fn find_by_id(&self, id: &FolderId) -> AppResult<Option<Folder>> {
        self.inner.find_by_id(id).await
    }

    async fn create(&self, folder: &Folder) -> AppResult<Folder> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        injected(&self.fail_create)?;
        self.inner.create(folder).await
    }
}

#[async_trait]
impl FolderStore for CountingFolderStore {
    async fn find_all(&self) -> AppResult<Vec<Folder>> {
        self.inner.find_all().await
    }

    async fn find_children(&self, parent_id: &FolderId) -> AppResult<Vec<Folder>> {
        self.inner.find_children(parent_id).await
    }

    async fn find_by_path(&self, full_path: &str) -> AppResult<Option<Folder>> {
        injected(&self.fail_find_by_path)?;
        self.inner.find_by_path(full_path).await
    }
}

/// Services wired to the doubles.
pub struct Harness {
    pub db: MemoryDatabase,
    pub objects: Arc<CountingObjectStore>,
    pub folder_store: Arc<CountingFolderStore>,
    pub folders: FolderService,
    pub files: FileService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_policy(UploadPolicy::default())
    }

    pub fn with_policy(policy: UploadPolicy) -> Self {
        Self::build(policy, MarkerStyle::TrailingSlash)
    }

    pub fn with_marker_style(style: MarkerStyle) -> Self {
        Self::build(UploadPolicy::default(), style)
    }

    fn build(policy: UploadPolicy, style: MarkerStyle) -> Self {
        let db = MemoryDatabase::new();
        let objects = Arc::new(CountingObjectStore {
            inner: MemoryObjectStore::new(style),
            ..Default::default()
        });
        let folder_store = Arc::new(CountingFolderStore {
            inner: db.folders(),
            creates: AtomicUsize::new(0),
            fail_create: Mutex::new(None),
            fail_find_by_path: Mutex::new(None),
        });
        let folders = FolderService::new(folder_store.clone(), objects.clone());
        let files = FileService::new(
            Arc::new(db.files()),
            folder_store.clone(),
            objects.clone(),
            policy,
        );
        Self {
            db,
            objects,
            folder_store,
            folders,
            files,
        }
    }

    /// Insert a pending file row directly, bypassing the service.
    pub async fn seed_pending_file(
        &self,
        folder: &Folder,
        name: &str,
        expires_at: DateTime<Utc>,
    ) -> File {
        let now = Utc::now();
        let file = File {
            id: FileId::new(),
            name: name.to_string(),
            folder_id: folder.id,
            full_path: format!("{}/{name}", folder.full_path),
            object_key: format!("{}/{name}", folder.full_path.trim_start_matches('/')),
            size: None,
            mime_type: None,
            uploaded_by: UserId::new(),
            status: UploadStatus::Pending,
            upload_expires_at: Some(expires_at),
            upload_url: None,
            created_at: now,
            updated_at: now,
        };
        self.db.files().create(&file).await.unwrap()
    }

    pub async fn file_row(&self, id: &FileId) -> File {
        self.db.files().get_by_id(id).await.unwrap()
    }
}
