use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Moderation state of a promo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "promo_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PromoStatus {
    Draft,
    Moderation,
    Accepted,
    Rejected,
}

impl std::fmt::Display for PromoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromoStatus::Draft => write!(f, "draft"),
            PromoStatus::Moderation => write!(f, "moderation"),
            PromoStatus::Accepted => write!(f, "accepted"),
            PromoStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Database model for promo
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Promo {
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
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Promo {
    /// True when `at` lies inside the validity window; open ends are unbounded.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.begin_at.map_or(true, |begin| begin <= at)
            && self.expire_at.map_or(true, |expire| at <= expire)
    }
}

#[derive(Debug, Clone)]
pub struct NewPromo {
    pub app_id: String,
    pub category_id: Option<Uuid>,
    pub office_id: Option<String>,
    pub user_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub code: Option<String>,
    pub active: bool,
    pub begin_at: Option<DateTime<Utc>>,
    pub expire_at: Option<DateTime<Utc>>,
}

/// Replacement values for the editable fields of a promo
#[derive(Debug, Clone)]
pub struct PromoPatch {
    pub category_id: Option<Uuid>,
    pub office_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub code: Option<String>,
    pub active: bool,
    pub begin_at: Option<DateTime<Utc>>,
    pub expire_at: Option<DateTime<Utc>>,
}

/// Listing filter; `None` fields do not restrict
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromoFilter {
    pub app_id: Option<String>,
    pub category_id: Option<Uuid>,
    pub office_id: Option<String>,
    pub status: Option<PromoStatus>,
    pub active: Option<bool>,
    /// Only promos whose validity window contains this instant
    pub valid_at: Option<DateTime<Utc>>,
}

impl PromoFilter {
    pub fn matches(&self, promo: &Promo) -> bool {
        self.app_id.as_ref().map_or(true, |a| *a == promo.app_id)
            && self.category_id.map_or(true, |c| Some(c) == promo.category_id)
            && self
                .office_id
                .as_ref()
                .map_or(true, |o| Some(o) == promo.office_id.as_ref())
            && self.status.map_or(true, |s| s == promo.status)
            && self.active.map_or(true, |a| a == promo.active)
            && self.valid_at.map_or(true, |at| promo.is_valid_at(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn promo() -> Promo {
        let now = Utc::now();
        Promo {
            id: Uuid::new_v4(),
            app_id: "shop".to_string(),
            category_id: None,
            office_id: Some("office-1".to_string()),
            user_id: None,
            title: "Coffee".to_string(),
            description: None,
            code: None,
            status: PromoStatus::Accepted,
            active: true,
            begin_at: None,
            expire_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_validity_window() {
        let now = Utc::now();
        let mut p = promo();
        assert!(p.is_valid_at(now));

        p.begin_at = Some(now + Duration::hours(1));
        assert!(!p.is_valid_at(now));

        p.begin_at = Some(now - Duration::hours(2));
        p.expire_at = Some(now - Duration::hours(1));
        assert!(!p.is_valid_at(now));
    }

    #[test]
    fn test_filter_matches() {
        let p = promo();
        assert!(PromoFilter::default().matches(&p));

        let filter = PromoFilter {
            app_id: Some("shop".to_string()),
            office_id: Some("office-1".to_string()),
            status: Some(PromoStatus::Accepted),
            active: Some(true),
            ..Default::default()
        };
        assert!(filter.matches(&p));

        let other_app = PromoFilter {
            app_id: Some("other".to_string()),
            ..Default::default()
        };
        assert!(!other_app.matches(&p));

        let drafts = PromoFilter {
            status: Some(PromoStatus::Draft),
            ..Default::default()
        };
        assert!(!drafts.matches(&p));
    }
}
