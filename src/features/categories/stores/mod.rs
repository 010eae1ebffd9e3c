mod pg_category_store;

#[cfg(test)]
pub mod memory;

pub use pg_category_store::PgCategoryStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::models::{Category, CategoryPatch, NewCategory};

/// Persistence for the category forest.
///
/// Implementations keep nested-set bounds consistent: inserts append, a
/// changed parent renumbers the forest, deletes remove the whole subtree.
/// Only rows without `deleted_at` are ever returned.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Inserts as the last child of `parent_id`, or as the last root.
    /// An unknown parent is `Invalid parameter: parent_id`.
    async fn save(&self, category: NewCategory) -> Result<Category>;

    async fn get(&self, id: Uuid) -> Result<Option<Category>>;

    /// One page ordered by `lft`, with the total number of active rows
    async fn get_page(&self, offset: i64, limit: i64) -> Result<(Vec<Category>, i64)>;

    async fn get_by_client_page(
        &self,
        client_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Category>, i64)>;

    /// `Ok(None)` when the category does not exist
    async fn update(&self, id: Uuid, patch: CategoryPatch) -> Result<Option<Category>>;

    /// Soft-deletes the category and its descendants; false when not found
    async fn delete(&self, id: Uuid) -> Result<bool>;
}
