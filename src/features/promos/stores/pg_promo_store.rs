use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::PromoStore;
use crate::core::database::push_cursor;
use crate::core::error::{handle_db_error, Result};
use crate::features::promos::models::{NewPromo, Promo, PromoFilter, PromoPatch, PromoStatus};
use crate::shared::types::ListCursor;

const COLUMNS: &str = "id, app_id, category_id, office_id, user_id, title, description, code, \
                       status, active, begin_at, expire_at, created_at, updated_at, deleted_at";

pub struct PgPromoStore {
    pool: PgPool,
}

impl PgPromoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PromoStore for PgPromoStore {
    async fn save(&self, promo: NewPromo) -> Result<Promo> {
        let saved = sqlx::query_as::<_, Promo>(&format!(
            r#"
            INSERT INTO promos (id, app_id, category_id, office_id, user_id, title,
                                description, code, status, active, begin_at, expire_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&promo.app_id)
        .bind(promo.category_id)
        .bind(&promo.office_id)
        .bind(&promo.user_id)
        .bind(&promo.title)
        .bind(&promo.description)
        .bind(&promo.code)
        .bind(PromoStatus::Draft)
        .bind(promo.active)
        .bind(promo.begin_at)
        .bind(promo.expire_at)
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)?;

        Ok(saved)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Promo>> {
        let promo = sqlx::query_as::<_, Promo>(&format!(
            "SELECT {COLUMNS} FROM promos WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(promo)
    }

    async fn list(
        &self,
        filter: &PromoFilter,
        cursor: ListCursor,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Promo>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM promos WHERE deleted_at IS NULL"
        ));

        if let Some(app_id) = &filter.app_id {
            builder.push(" AND app_id = ").push_bind(app_id.clone());
        }
        if let Some(category_id) = filter.category_id {
            builder.push(" AND category_id = ").push_bind(category_id);
        }
        if let Some(office_id) = &filter.office_id {
            builder.push(" AND office_id = ").push_bind(office_id.clone());
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(active) = filter.active {
            builder.push(" AND active = ").push_bind(active);
        }
        if let Some(at) = filter.valid_at {
            builder
                .push(" AND (begin_at IS NULL OR begin_at <= ")
                .push_bind(at)
                .push(") AND (expire_at IS NULL OR expire_at >= ")
                .push_bind(at)
                .push(")");
        }

        push_cursor(&mut builder, "promos", cursor, offset, limit);

        let promos = builder
            .build_query_as::<Promo>()
            .fetch_all(&self.pool)
            .await?;
        Ok(promos)
    }

    async fn update(&self, id: Uuid, patch: PromoPatch) -> Result<Option<Promo>> {
        let promo = sqlx::query_as::<_, Promo>(&format!(
            r#"
            UPDATE promos
            SET category_id = $2, office_id = $3, title = $4, description = $5, code = $6,
                active = $7, begin_at = $8, expire_at = $9, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.category_id)
        .bind(&patch.office_id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(&patch.code)
        .bind(patch.active)
        .bind(patch.begin_at)
        .bind(patch.expire_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(handle_db_error)?;

        Ok(promo)
    }

    async fn update_status(&self, id: Uuid, status: PromoStatus) -> Result<Option<Promo>> {
        let promo = sqlx::query_as::<_, Promo>(&format!(
            r#"
            UPDATE promos
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(promo)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE promos SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
