use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{check_bulk_limit, TransactionStore};
use crate::core::database::push_cursor;
use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::transactions::models::{
    NewTransaction, Transaction, TransactionPatch, UserBalance,
};
use crate::shared::types::ListCursor;

const COLUMNS: &str =
    "id, user_id, app_id, value, kind, description, created_at, updated_at, deleted_at";

pub(super) const BALANCE_COLUMNS: &str =
    "user_id, app_id, phone, balance, sms_notify, created_at, updated_at";

pub struct PgTransactionStore {
    pool: PgPool,
}

impl PgTransactionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        transaction: &NewTransaction,
    ) -> Result<Transaction> {
        let saved = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            INSERT INTO transactions (id, user_id, app_id, value, kind, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&transaction.user_id)
        .bind(&transaction.app_id)
        .bind(transaction.value)
        .bind(transaction.kind)
        .bind(&transaction.description)
        .fetch_one(executor)
        .await
        .map_err(handle_db_error)?;
        Ok(saved)
    }
}

#[async_trait]
impl TransactionStore for PgTransactionStore {
    async fn save(&self, transaction: NewTransaction) -> Result<Transaction> {
        Self::insert(&self.pool, &transaction).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {COLUMNS} FROM transactions WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(transaction)
    }

    async fn list(&self, cursor: ListCursor, offset: i64, limit: i64) -> Result<Vec<Transaction>> {
        check_bulk_limit(limit)?;

        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM transactions WHERE deleted_at IS NULL"
        ));
        push_cursor(&mut builder, "transactions", cursor, offset, limit);

        let transactions = builder
            .build_query_as::<Transaction>()
            .fetch_all(&self.pool)
            .await?;
        Ok(transactions)
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            SELECT {COLUMNS} FROM transactions
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(transactions)
    }

    async fn update(&self, id: Uuid, patch: TransactionPatch) -> Result<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            UPDATE transactions
            SET value = $2, kind = $3, description = $4, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.value)
        .bind(patch.kind)
        .bind(&patch.description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(transaction)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE transactions SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn accrue(&self, transaction: NewTransaction) -> Result<(Transaction, UserBalance)> {
        let mut tx = self.pool.begin().await?;

        let balance = sqlx::query_as::<_, UserBalance>(&format!(
            r#"
            INSERT INTO user_balances (user_id, app_id, balance)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET balance = user_balances.balance + EXCLUDED.balance,
                app_id = COALESCE(user_balances.app_id, EXCLUDED.app_id),
                updated_at = NOW()
            RETURNING {BALANCE_COLUMNS}
            "#
        ))
        .bind(&transaction.user_id)
        .bind(&transaction.app_id)
        .bind(transaction.value)
        .fetch_one(&mut *tx)
        .await?;

        let saved = Self::insert(&mut *tx, &transaction).await?;
        tx.commit().await?;

        Ok((saved, balance))
    }

    async fn deduct(&self, transaction: NewTransaction) -> Result<(Transaction, UserBalance)> {
        let mut tx = self.pool.begin().await?;

        let balance = sqlx::query_as::<_, UserBalance>(&format!(
            r#"
            UPDATE user_balances
            SET balance = balance - $2, updated_at = NOW()
            WHERE user_id = $1 AND balance >= $2
            RETURNING {BALANCE_COLUMNS}
            "#
        ))
        .bind(&transaction.user_id)
        .bind(transaction.value)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::invalid_param("value"))?;

        let saved = Self::insert(&mut *tx, &transaction).await?;
        tx.commit().await?;

        Ok((saved, balance))
    }
}
