//! File store trait and PostgreSQL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dirhub_core::error::AppError;
use dirhub_core::result::AppResult;
use dirhub_core::traits::Repository;
use dirhub_core::types::{FileId, FolderId};
use dirhub_entity::file::{File, UploadStatus};

use crate::error::map_sqlx_error;

/// Durable storage for file rows.
#[async_trait]
pub trait FileStore: Repository<File, FileId> + std::fmt::Debug {
    /// Files directly inside a folder, ordered by name.
    async fn find_by_folder(&self, folder_id: &FolderId) -> AppResult<Vec<File>>;

    /// Move a file to a new upload status, recording the observed size when given.
    ///
    /// Fails with `NotFound` when the row does not exist.
    async fn update_status(
        &self,
        id: &FileId,
        status: UploadStatus,
        size: Option<i64>,
    ) -> AppResult<File>;

    /// Pending files whose upload window closed at or before `now`, oldest first.
    async fn find_pending_expired(&self, now: DateTime<Utc>, limit: i64) -> AppResult<Vec<File>>;

    /// Fetch a file, failing with `NotFound` when it does not exist.
    async fn get_by_id(&self, id: &FileId) -> AppResult<File> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }
}

/// Repository for file rows in PostgreSQL.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<File, FileId> for FileRepository {
    async fn find_by_id(&self, id: &FileId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to find file"))
    }

    async fn create(&self, file: &File) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (id, name, folder_id, full_path, object_key, size, mime_type, \
             uploaded_by, status, upload_expires_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
        )
        .bind(file.id)
        .bind(&file.name)
        .bind(file.folder_id)
        .bind(&file.full_path)
        .bind(&file.object_key)
        .bind(file.size)
        .bind(&file.mime_type)
        .bind(file.uploaded_by)
        .bind(file.status)
        .bind(file.upload_expires_at)
        .bind(file.created_at)
        .bind(file.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to create file"))
    }
}

#[async_trait]
impl FileStore for FileRepository {
    async fn find_by_folder(&self, folder_id: &FolderId) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE folder_id = $1 ORDER BY name ASC")
            .bind(folder_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to list files"))
    }

    async fn update_status(
        &self,
        id: &FileId,
        status: UploadStatus,
        size: Option<i64>,
    ) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET status = $2, size = COALESCE($3, size), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(size)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to update file status"))
    }

    async fn find_pending_expired(&self, now: DateTime<Utc>, limit: i64) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE status = 'pending' AND upload_expires_at <= $1 \
             ORDER BY upload_expires_at ASC LIMIT $2",
        )
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to list expired uploads"))
    }
}
