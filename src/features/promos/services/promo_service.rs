use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::promos::dtos::{
    CreatePromoDto, PromoListQuery, PromoResponseDto, UpdatePromoDto,
};
use crate::features::promos::models::{NewPromo, PromoFilter, PromoStatus};
use crate::features::promos::stores::PromoStore;
use crate::shared::types::{ListCursor, PaginationQuery};

/// Service for promo operations
pub struct PromoService {
    store: Arc<dyn PromoStore>,
}

fn check_window(begin_at: Option<DateTime<Utc>>, expire_at: Option<DateTime<Utc>>) -> Result<()> {
    match (begin_at, expire_at) {
        (Some(begin), Some(expire)) if begin > expire => Err(AppError::invalid_param("expire_at")),
        _ => Ok(()),
    }
}

/// Effective listing filter for `caller`.
///
/// Anonymous callers and plain members only ever see the mobile view:
/// accepted, active promos valid right now.
pub fn list_filter(caller: Option<&AuthenticatedUser>, query: PromoListQuery) -> PromoFilter {
    let mut filter = PromoFilter {
        app_id: query
            .app_id
            .filter(|a| !a.is_empty())
            .or_else(|| caller.and_then(|u| u.app_id.clone())),
        category_id: query.category_id,
        office_id: query.office_id,
        status: query.status,
        active: query.active,
        valid_at: None,
    };

    if caller.map_or(true, |u| u.is_member_only()) {
        filter.status = Some(PromoStatus::Accepted);
        filter.active = Some(true);
        filter.valid_at = Some(Utc::now());
    }

    filter
}

impl PromoService {
    pub fn new(store: Arc<dyn PromoStore>) -> Self {
        Self { store }
    }

    pub async fn list(
        &self,
        caller: Option<&AuthenticatedUser>,
        query: PromoListQuery,
        cursor: ListCursor,
        pagination: &PaginationQuery,
    ) -> Result<Vec<PromoResponseDto>> {
        let filter = list_filter(caller, query);
        let (offset, limit) = cursor.window(pagination);

        let promos = self
            .store
            .list(&filter, cursor, offset, limit)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list promos: {:?}", e);
                e
            })?;

        Ok(promos.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<PromoResponseDto> {
        self.store
            .get(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Promo '{}' not found", id)))
    }

    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        dto: CreatePromoDto,
    ) -> Result<PromoResponseDto> {
        check_window(dto.begin_at, dto.expire_at)?;

        let app_id = dto
            .app_id
            .or_else(|| caller.app_id.clone())
            .ok_or_else(|| AppError::invalid_param("app_id"))?;

        let promo = self
            .store
            .save(NewPromo {
                app_id,
                category_id: dto.category_id,
                office_id: dto.office_id,
                user_id: Some(caller.user_id.clone()),
                title: dto.title,
                description: dto.description,
                code: dto.code,
                active: dto.active,
                begin_at: dto.begin_at,
                expire_at: dto.expire_at,
            })
            .await?;

        tracing::info!("Promo created: id={}, app_id={}", promo.id, promo.app_id);
        Ok(promo.into())
    }

    pub async fn update(&self, id: Uuid, dto: UpdatePromoDto) -> Result<PromoResponseDto> {
        check_window(dto.begin_at, dto.expire_at)?;

        let promo = self
            .store
            .update(id, dto.into())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Promo '{}' not found", id)))?;

        tracing::info!("Promo updated: id={}", promo.id);
        Ok(promo.into())
    }

    pub async fn update_status(&self, id: Uuid, status: PromoStatus) -> Result<PromoResponseDto> {
        let promo = self
            .store
            .update_status(id, status)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Promo '{}' not found", id)))?;

        tracing::info!("Promo {} moved to {}", promo.id, status);
        Ok(promo.into())
    }

    /// Applies `status` to every id; ids that fail are logged and skipped.
    /// Returns how many promos were updated.
    pub async fn update_statuses(&self, ids: &[Uuid], status: PromoStatus) -> usize {
        let mut updated = 0;
        for id in ids {
            match self.store.update_status(*id, status).await {
                Ok(Some(_)) => updated += 1,
                Ok(None) => tracing::warn!("Skipping status update for missing promo {}", id),
                Err(e) => tracing::warn!("Failed to update status of promo {}: {:?}", id, e),
            }
        }

        tracing::info!("Moved {}/{} promos to {}", updated, ids.len(), status);
        updated
    }

    /// Soft delete. A promo the caller cannot see is a permission error,
    /// not a 404.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if self.store.get(id).await?.is_none() {
            return Err(AppError::Forbidden(
                "You do not have permission to delete this promo".to_string(),
            ));
        }

        self.store.delete(id).await?;
        tracing::info!("Promo deleted: id={}", id);
        Ok(())
    }
}
