use async_trait::async_trait;
use sqlx::PgPool;

use super::pg_transaction_store::BALANCE_COLUMNS;
use super::BalanceStore;
use crate::core::error::Result;
use crate::features::transactions::models::UserBalance;

pub struct PgBalanceStore {
    pool: PgPool,
}

impl PgBalanceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BalanceStore for PgBalanceStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserBalance>> {
        let balance = sqlx::query_as::<_, UserBalance>(&format!(
            "SELECT {BALANCE_COLUMNS} FROM user_balances WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(balance)
    }

    async fn list_by_app(&self, app_id: &str) -> Result<Vec<UserBalance>> {
        let balances = sqlx::query_as::<_, UserBalance>(&format!(
            "SELECT {BALANCE_COLUMNS} FROM user_balances WHERE app_id = $1 ORDER BY created_at"
        ))
        .bind(app_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(balances)
    }

    async fn set_phone(
        &self,
        user_id: &str,
        app_id: Option<String>,
        phone: &str,
    ) -> Result<UserBalance> {
        let balance = sqlx::query_as::<_, UserBalance>(&format!(
            r#"
            INSERT INTO user_balances (user_id, app_id, phone)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET phone = EXCLUDED.phone,
                app_id = COALESCE(user_balances.app_id, EXCLUDED.app_id),
                updated_at = NOW()
            RETURNING {BALANCE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(app_id)
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;
        Ok(balance)
    }
}
