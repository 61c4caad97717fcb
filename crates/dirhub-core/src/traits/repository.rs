//! Generic repository trait for metadata store access.

use async_trait::async_trait;

use crate::result::AppResult;

/// Create-and-fetch repository shared by every metadata entity.
///
/// Entity-specific queries live on the per-entity store traits that extend
/// this one. Rows are never updated in place by the orchestration core, so
/// there is no generic `update` or `delete`.
#[async_trait]
pub trait Repository<Entity, Id>: Send + Sync + 'static
where
    Entity: Send + Sync + 'static,
    Id: Send + Sync + 'static,
{
    /// Find an entity by its primary key.
    async fn find_by_id(&self, id: &Id) -> AppResult<Option<Entity>>;

    /// Persist a fully-populated entity and return the stored row.
    async fn create(&self, entity: &Entity) -> AppResult<Entity>;
}
