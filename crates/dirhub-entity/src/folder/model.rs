//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use dirhub_core::types::{FolderId, UserId};

/// A folder in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name; also its path segment.
    pub name: String,
    /// Parent folder ID (null for root folders).
    pub parent_id: Option<FolderId>,
    /// The folder owner.
    pub owner_id: UserId,
    /// Full materialized path (e.g., `/docs/2024`).
    pub full_path: String,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Depth below the root, derived from the path (0 for root folders).
    pub fn depth(&self) -> usize {
        self.full_path.matches('/').count().saturating_sub(1)
    }
}
