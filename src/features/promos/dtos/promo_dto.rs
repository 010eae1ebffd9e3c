use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::promos::models::{Promo, PromoPatch, PromoStatus};

/// Response DTO for promo
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PromoResponseDto {
    pub id: Uuid,
    pub app_id: String,
    pub category_id: Option<Uuid>,
    pub office_id: Option<String>,
    pub user_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub code: Option<String>,
    pub status: PromoStatus,
    pub active: bool,
    pub begin_at: Option<DateTime<Utc>>,
    pub expire_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Promo> for PromoResponseDto {
    fn from(p: Promo) -> Self {
        Self {
            id: p.id,
            app_id: p.app_id,
            category_id: p.category_id,
            office_id: p.office_id,
            user_id: p.user_id,
            title: p.title,
            description: p.description,
            code: p.code,
            status: p.status,
            active: p.active,
            begin_at: p.begin_at,
            expire_at: p.expire_at,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// New promos start as `draft`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePromoDto {
    /// Defaults to the caller's application
    #[validate(length(min = 1, max = 128))]
    pub app_id: Option<String>,

    pub category_id: Option<Uuid>,

    #[validate(length(min = 1, max = 128))]
    pub office_id: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(max = 4000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub code: Option<String>,

    #[serde(default)]
    pub active: bool,

    pub begin_at: Option<DateTime<Utc>>,
    pub expire_at: Option<DateTime<Utc>>,
}

/// Full replacement of the editable fields. `id` must repeat the id in the URL.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePromoDto {
    pub id: Uuid,

    pub category_id: Option<Uuid>,

    #[validate(length(min = 1, max = 128))]
    pub office_id: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(max = 4000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub code: Option<String>,

    #[serde(default)]
    pub active: bool,

    pub begin_at: Option<DateTime<Utc>>,
    pub expire_at: Option<DateTime<Utc>>,
}

impl From<UpdatePromoDto> for PromoPatch {
    fn from(dto: UpdatePromoDto) -> Self {
        Self {
            category_id: dto.category_id,
            office_id: dto.office_id,
            title: dto.title,
            description: dto.description,
            code: dto.code,
            active: dto.active,
            begin_at: dto.begin_at,
            expire_at: dto.expire_at,
        }
    }
}

/// Status change for one promo (`promo_id`) or many (`promo_ids`)
#[derive(Debug, Deserialize, ToSchema)]
pub struct PromoStatusDto {
    pub promo_id: Option<Uuid>,
    #[serde(default)]
    pub promo_ids: Vec<Uuid>,
    pub status: PromoStatus,
}

/// Filters for listing promos
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PromoListQuery {
    /// Defaults to the caller's application
    pub app_id: Option<String>,
    pub category_id: Option<Uuid>,
    pub office_id: Option<String>,
    pub status: Option<PromoStatus>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rejects_empty_title() {
        let dto: CreatePromoDto =
            serde_json::from_value(serde_json::json!({ "title": "" })).unwrap();

        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_defaults() {
        let dto: CreatePromoDto =
            serde_json::from_value(serde_json::json!({ "title": "Coffee" })).unwrap();

        assert!(dto.validate().is_ok());
        assert!(!dto.active);
        assert!(dto.app_id.is_none());
    }

    #[test]
    fn test_status_dto_accepts_bulk_form() {
        let id = Uuid::new_v4();
        let dto: PromoStatusDto = serde_json::from_value(serde_json::json!({
            "promo_ids": [id],
            "status": "accepted"
        }))
        .unwrap();

        assert_eq!(dto.promo_ids, vec![id]);
        assert!(dto.promo_id.is_none());
        assert_eq!(dto.status, PromoStatus::Accepted);
    }
}
