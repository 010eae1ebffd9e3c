use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::PromoStore;
use crate::core::error::Result;
use crate::features::promos::models::{NewPromo, Promo, PromoFilter, PromoPatch, PromoStatus};
use crate::shared::test_helpers::apply_cursor;
use crate::shared::types::ListCursor;

#[derive(Default)]
pub struct MemoryPromoStore {
    rows: RwLock<Vec<Promo>>,
}

impl MemoryPromoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully formed row, bypassing `save` defaults
    pub async fn insert(&self, promo: Promo) {
        self.rows.write().await.push(promo);
    }
}

#[async_trait]
impl PromoStore for MemoryPromoStore {
    async fn save(&self, promo: NewPromo) -> Result<Promo> {
        let now = Utc::now();
        let saved = Promo {
            id: Uuid::new_v4(),
            app_id: promo.app_id,
            category_id: promo.category_id,
            office_id: promo.office_id,
            user_id: promo.user_id,
            title: promo.title,
            description: promo.description,
            code: promo.code,
            status: PromoStatus::Draft,
            active: promo.active,
            begin_at: promo.begin_at,
            expire_at: promo.expire_at,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.rows.write().await.push(saved.clone());
        Ok(saved)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Promo>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|p| p.id == id && p.deleted_at.is_none())
            .cloned())
    }

    async fn list(
        &self,
        filter: &PromoFilter,
        cursor: ListCursor,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Promo>> {
        let rows: Vec<Promo> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|p| p.deleted_at.is_none() && filter.matches(p))
            .cloned()
            .collect();

        Ok(apply_cursor(rows, cursor, offset, limit, |p| {
            (p.id, p.created_at, p.updated_at)
        }))
    }

    async fn update(&self, id: Uuid, patch: PromoPatch) -> Result<Option<Promo>> {
        let mut rows = self.rows.write().await;
        let Some(promo) = rows
            .iter_mut()
            .find(|p| p.id == id && p.deleted_at.is_none())
        else {
            return Ok(None);
        };

        promo.category_id = patch.category_id;
        promo.office_id = patch.office_id;
        promo.title = patch.title;
        promo.description = patch.description;
        promo.code = patch.code;
        promo.active = patch.active;
        promo.begin_at = patch.begin_at;
        promo.expire_at = patch.expire_at;
        promo.updated_at = Utc::now();
        Ok(Some(promo.clone()))
    }

    async fn update_status(&self, id: Uuid, status: PromoStatus) -> Result<Option<Promo>> {
        let mut rows = self.rows.write().await;
        Ok(rows
            .iter_mut()
            .find(|p| p.id == id && p.deleted_at.is_none())
            .map(|promo| {
                promo.status = status;
                promo.updated_at = Utc::now();
                promo.clone()
            }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut rows = self.rows.write().await;
        match rows
            .iter_mut()
            .find(|p| p.id == id && p.deleted_at.is_none())
        {
            Some(promo) => {
                let now = Utc::now();
                promo.deleted_at = Some(now);
                promo.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
