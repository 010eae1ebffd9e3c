mod pg_balance_store;
mod pg_transaction_store;

#[cfg(test)]
pub mod memory;

pub use pg_balance_store::PgBalanceStore;
pub use pg_transaction_store::PgTransactionStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::transactions::models::{
    NewTransaction, Transaction, TransactionPatch, UserBalance,
};
use crate::shared::constants::MAX_BULK_LIMIT;
use crate::shared::types::ListCursor;

/// Persistence for transactions; soft-deleted rows are never returned
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Stores the row as is, without touching any balance
    async fn save(&self, transaction: NewTransaction) -> Result<Transaction>;

    async fn get(&self, id: Uuid) -> Result<Option<Transaction>>;

    /// Fails with `Invalid parameter: limit` above `MAX_BULK_LIMIT`
    async fn list(&self, cursor: ListCursor, offset: i64, limit: i64) -> Result<Vec<Transaction>>;

    /// Newest first
    async fn list_by_user(&self, user_id: &str, offset: i64, limit: i64)
        -> Result<Vec<Transaction>>;

    async fn update(&self, id: Uuid, patch: TransactionPatch) -> Result<Option<Transaction>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Records the accrual and raises the balance in one unit, creating the
    /// balance row if needed.
    async fn accrue(&self, transaction: NewTransaction) -> Result<(Transaction, UserBalance)>;

    /// Records the deduction and lowers the balance in one unit. Fails with
    /// `Invalid parameter: value` when the balance does not cover it.
    async fn deduct(&self, transaction: NewTransaction) -> Result<(Transaction, UserBalance)>;
}

/// Member balances and contact details
#[async_trait]
pub trait BalanceStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<UserBalance>>;

    /// Every member registered under `app_id`
    async fn list_by_app(&self, app_id: &str) -> Result<Vec<UserBalance>>;

    /// Stores the phone, creating a zero balance row if needed
    async fn set_phone(
        &self,
        user_id: &str,
        app_id: Option<String>,
        phone: &str,
    ) -> Result<UserBalance>;
}

fn check_bulk_limit(limit: i64) -> Result<()> {
    if limit > MAX_BULK_LIMIT {
        return Err(AppError::invalid_param("limit"));
    }
    Ok(())
}
