use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::CategoryStore;
use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::categories::models::nested_set::{self, Bounds};
use crate::features::categories::models::{Category, CategoryPatch, NewCategory};

const COLUMNS: &str =
    "id, client_id, name, parent_id, lft, rgt, depth, created_at, updated_at, deleted_at";

pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Starts a transaction holding the table lock that serializes bound
    /// changes; readers are not blocked.
    async fn begin_locked(&self) -> Result<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("LOCK TABLE categories IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    async fn fetch_active(
        tx: &mut Transaction<'static, Postgres>,
        id: Uuid,
    ) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(category)
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn save(&self, category: NewCategory) -> Result<Category> {
        let mut tx = self.begin_locked().await?;

        let bounds = match category.parent_id {
            Some(parent_id) => {
                let parent = Self::fetch_active(&mut tx, parent_id)
                    .await?
                    .ok_or_else(|| AppError::invalid_param("parent_id"))?;

                sqlx::query(
                    "UPDATE categories SET rgt = rgt + 2 WHERE rgt >= $1 AND deleted_at IS NULL",
                )
                .bind(parent.rgt)
                .execute(&mut *tx)
                .await?;
                sqlx::query(
                    "UPDATE categories SET lft = lft + 2 WHERE lft > $1 AND deleted_at IS NULL",
                )
                .bind(parent.rgt)
                .execute(&mut *tx)
                .await?;

                nested_set::append_bounds(Some(&parent), 0)
            }
            None => {
                let max_rgt: i32 = sqlx::query_scalar(
                    "SELECT COALESCE(MAX(rgt), 0) FROM categories WHERE deleted_at IS NULL",
                )
                .fetch_one(&mut *tx)
                .await?;
                nested_set::append_bounds(None, max_rgt)
            }
        };

        let saved = sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO categories (id, client_id, name, parent_id, lft, rgt, depth)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&category.client_id)
        .bind(&category.name)
        .bind(category.parent_id)
        .bind(bounds.lft)
        .bind(bounds.rgt)
        .bind(bounds.depth)
        .fetch_one(&mut *tx)
        .await
        .map_err(handle_db_error)?;

        tx.commit().await?;
        Ok(saved)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    async fn get_page(&self, offset: i64, limit: i64) -> Result<(Vec<Category>, i64)> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            r#"
            SELECT {COLUMNS} FROM categories
            WHERE deleted_at IS NULL
            ORDER BY lft
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;

        Ok((categories, total))
    }

    async fn get_by_client_page(
        &self,
        client_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Category>, i64)> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            r#"
            SELECT {COLUMNS} FROM categories
            WHERE client_id = $1 AND deleted_at IS NULL
            ORDER BY lft
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(client_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM categories WHERE client_id = $1 AND deleted_at IS NULL",
        )
        .bind(client_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((categories, total))
    }

    async fn update(&self, id: Uuid, patch: CategoryPatch) -> Result<Option<Category>> {
        let mut tx = self.begin_locked().await?;

        let Some(current) = Self::fetch_active(&mut tx, id).await? else {
            return Ok(None);
        };

        let reparented = current.parent_id != patch.parent_id;
        if reparented {
            if let Some(parent_id) = patch.parent_id {
                let parent = Self::fetch_active(&mut tx, parent_id)
                    .await?
                    .ok_or_else(|| AppError::invalid_param("parent_id"))?;
                nested_set::check_move(&current, &parent)?;
            }
        }

        sqlx::query(
            r#"
            UPDATE categories
            SET client_id = $2, name = $3, parent_id = $4, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&patch.client_id)
        .bind(&patch.name)
        .bind(patch.parent_id)
        .execute(&mut *tx)
        .await
        .map_err(handle_db_error)?;

        if reparented {
            let rows = sqlx::query_as::<_, Category>(&format!(
                "SELECT {COLUMNS} FROM categories WHERE deleted_at IS NULL"
            ))
            .fetch_all(&mut *tx)
            .await?;

            let renumbered = nested_set::renumber(&rows, Some(id));
            let mut ids = Vec::with_capacity(renumbered.len());
            let mut lfts = Vec::with_capacity(renumbered.len());
            let mut rgts = Vec::with_capacity(renumbered.len());
            let mut depths = Vec::with_capacity(renumbered.len());
            for (row_id, Bounds { lft, rgt, depth }) in renumbered {
                ids.push(row_id);
                lfts.push(lft);
                rgts.push(rgt);
                depths.push(depth);
            }

            sqlx::query(
                r#"
                UPDATE categories AS c
                SET lft = v.lft, rgt = v.rgt, depth = v.depth
                FROM UNNEST($1::uuid[], $2::int[], $3::int[], $4::int[]) AS v(id, lft, rgt, depth)
                WHERE c.id = v.id
                "#,
            )
            .bind(&ids)
            .bind(&lfts)
            .bind(&rgts)
            .bind(&depths)
            .execute(&mut *tx)
            .await?;

            tracing::debug!("Renumbered {} categories after moving {}", ids.len(), id);
        }

        let updated = Self::fetch_active(&mut tx, id).await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.begin_locked().await?;

        let Some(category) = Self::fetch_active(&mut tx, id).await? else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            UPDATE categories
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE deleted_at IS NULL AND lft >= $1 AND rgt <= $2
            "#,
        )
        .bind(category.lft)
        .bind(category.rgt)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            "Soft-deleted category {} with {} rows in subtree",
            id,
            result.rows_affected()
        );
        Ok(true)
    }
}
