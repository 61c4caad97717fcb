//! Folder store trait and PostgreSQL repository.

use async_trait::async_trait;
use sqlx::PgPool;

use dirhub_core::error::AppError;
use dirhub_core::result::AppResult;
use dirhub_core::traits::Repository;
use dirhub_core::types::FolderId;
use dirhub_entity::folder::Folder;

use crate::error::map_sqlx_error;

/// Durable storage for folder rows.
///
/// `create` reports a sibling name clash as `Conflict` and a missing parent
/// row as `InvalidParent`.
#[async_trait]
pub trait FolderStore: Repository<Folder, FolderId> + std::fmt::Debug {
    /// Every folder, ordered by `full_path`.
    async fn find_all(&self) -> AppResult<Vec<Folder>>;

    /// Direct children of a folder. Grandchildren are never included.
    async fn find_children(&self, parent_id: &FolderId) -> AppResult<Vec<Folder>>;

    /// The folder stored under an exact `full_path`, if any.
    async fn find_by_path(&self, full_path: &str) -> AppResult<Option<Folder>>;

    /// Fetch a folder, failing with `NotFound` when it does not exist.
    async fn get_by_id(&self, id: &FolderId) -> AppResult<Folder> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }
}

/// Repository for folder rows in PostgreSQL.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Folder, FolderId> for FolderRepository {
    async fn find_by_id(&self, id: &FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to find folder"))
    }

    async fn create(&self, folder: &Folder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, name, parent_id, owner_id, full_path, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(folder.id)
        .bind(&folder.name)
        .bind(folder.parent_id)
        .bind(folder.owner_id)
        .bind(&folder.full_path)
        .bind(folder.created_at)
        .bind(folder.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to create folder"))
    }
}

#[async_trait]
impl FolderStore for FolderRepository {
    async fn find_all(&self) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders ORDER BY full_path ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to list folders"))
    }

    async fn find_children(&self, parent_id: &FolderId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE parent_id = $1 ORDER BY name ASC",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to list child folders"))
    }

    async fn find_by_path(&self, full_path: &str) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE full_path = $1 LIMIT 1")
            .bind(full_path)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to find folder by path"))
    }
}
