mod pg_promo_store;

#[cfg(test)]
pub mod memory;

pub use pg_promo_store::PgPromoStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::promos::models::{NewPromo, Promo, PromoFilter, PromoPatch, PromoStatus};
use crate::shared::types::ListCursor;

/// Persistence for promos; soft-deleted rows are never returned
#[async_trait]
pub trait PromoStore: Send + Sync {
    async fn save(&self, promo: NewPromo) -> Result<Promo>;

    async fn get(&self, id: Uuid) -> Result<Option<Promo>>;

    async fn list(
        &self,
        filter: &PromoFilter,
        cursor: ListCursor,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Promo>>;

    async fn update(&self, id: Uuid, patch: PromoPatch) -> Result<Option<Promo>>;

    async fn update_status(&self, id: Uuid, status: PromoStatus) -> Result<Option<Promo>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;
}
