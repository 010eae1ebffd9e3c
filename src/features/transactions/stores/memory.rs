use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{check_bulk_limit, BalanceStore, TransactionStore};
use crate::core::error::{AppError, Result};
use crate::features::transactions::models::{
    NewTransaction, Transaction, TransactionPatch, UserBalance,
};
use crate::shared::test_helpers::apply_cursor;
use crate::shared::types::ListCursor;

#[derive(Default)]
struct Ledger {
    transactions: Vec<Transaction>,
    balances: Vec<UserBalance>,
}

/// Transactions and balances sharing one lock, so accruals move both
#[derive(Default)]
pub struct MemoryLedger {
    inner: RwLock<Ledger>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a member with an opening balance
    pub async fn add_member(
        &self,
        user_id: &str,
        app_id: &str,
        balance: Decimal,
        phone: Option<&str>,
    ) {
        let now = Utc::now();
        self.inner.write().await.balances.push(UserBalance {
            user_id: user_id.to_string(),
            app_id: Some(app_id.to_string()),
            phone: phone.map(str::to_string),
            balance,
            sms_notify: phone.is_some(),
            created_at: now,
            updated_at: now,
        });
    }

    pub async fn transactions_of(&self, user_id: &str) -> Vec<Transaction> {
        self.inner
            .read()
            .await
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }
}

impl Ledger {
    fn record(&mut self, transaction: NewTransaction) -> Transaction {
        let now = Utc::now();
        let saved = Transaction {
            id: Uuid::new_v4(),
            user_id: transaction.user_id,
            app_id: transaction.app_id,
            value: transaction.value,
            kind: transaction.kind,
            description: transaction.description,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.transactions.push(saved.clone());
        saved
    }

    fn balance_mut(&mut self, user_id: &str, app_id: Option<String>) -> &mut UserBalance {
        if let Some(pos) = self.balances.iter().position(|b| b.user_id == user_id) {
            return &mut self.balances[pos];
        }

        let now = Utc::now();
        self.balances.push(UserBalance {
            user_id: user_id.to_string(),
            app_id,
            phone: None,
            balance: Decimal::ZERO,
            sms_notify: false,
            created_at: now,
            updated_at: now,
        });
        let last = self.balances.len() - 1;
        &mut self.balances[last]
    }

    fn active_mut(&mut self, id: Uuid) -> Option<&mut Transaction> {
        self.transactions
            .iter_mut()
            .find(|t| t.id == id && t.deleted_at.is_none())
    }
}

#[async_trait]
impl TransactionStore for MemoryLedger {
    async fn save(&self, transaction: NewTransaction) -> Result<Transaction> {
        Ok(self.inner.write().await.record(transaction))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Transaction>> {
        Ok(self
            .inner
            .read()
            .await
            .transactions
            .iter()
            .find(|t| t.id == id && t.deleted_at.is_none())
            .cloned())
    }

    async fn list(&self, cursor: ListCursor, offset: i64, limit: i64) -> Result<Vec<Transaction>> {
        check_bulk_limit(limit)?;

        let rows: Vec<Transaction> = self
            .inner
            .read()
            .await
            .transactions
            .iter()
            .filter(|t| t.deleted_at.is_none())
            .cloned()
            .collect();

        Ok(apply_cursor(rows, cursor, offset, limit, |t| {
            (t.id, t.created_at, t.updated_at)
        }))
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Transaction>> {
        let rows: Vec<Transaction> = self
            .inner
            .read()
            .await
            .transactions
            .iter()
            .filter(|t| t.deleted_at.is_none() && t.user_id == user_id)
            .cloned()
            .collect();

        Ok(apply_cursor(rows, ListCursor::Page, offset, limit, |t| {
            (t.id, t.created_at, t.updated_at)
        }))
    }

    async fn update(&self, id: Uuid, patch: TransactionPatch) -> Result<Option<Transaction>> {
        let mut ledger = self.inner.write().await;
        Ok(ledger.active_mut(id).map(|t| {
            t.value = patch.value;
            t.kind = patch.kind;
            t.description = patch.description;
            t.updated_at = Utc::now();
            t.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut ledger = self.inner.write().await;
        match ledger.active_mut(id) {
            Some(t) => {
                let now = Utc::now();
                t.deleted_at = Some(now);
                t.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn accrue(&self, transaction: NewTransaction) -> Result<(Transaction, UserBalance)> {
        let mut ledger = self.inner.write().await;

        let balance = ledger.balance_mut(&transaction.user_id, transaction.app_id.clone());
        balance.balance += transaction.value;
        balance.updated_at = Utc::now();
        let balance = balance.clone();

        Ok((ledger.record(transaction), balance))
    }

    async fn deduct(&self, transaction: NewTransaction) -> Result<(Transaction, UserBalance)> {
        let mut ledger = self.inner.write().await;

        let balance = ledger
            .balances
            .iter_mut()
            .find(|b| b.user_id == transaction.user_id && b.balance >= transaction.value)
            .ok_or_else(|| AppError::invalid_param("value"))?;
        balance.balance -= transaction.value;
        balance.updated_at = Utc::now();
        let balance = balance.clone();

        Ok((ledger.record(transaction), balance))
    }
}

#[async_trait]
impl BalanceStore for MemoryLedger {
    async fn get(&self, user_id: &str) -> Result<Option<UserBalance>> {
        Ok(self
            .inner
            .read()
            .await
            .balances
            .iter()
            .find(|b| b.user_id == user_id)
            .cloned())
    }

    async fn list_by_app(&self, app_id: &str) -> Result<Vec<UserBalance>> {
        Ok(self
            .inner
            .read()
            .await
            .balances
            .iter()
            .filter(|b| b.app_id.as_deref() == Some(app_id))
            .cloned()
            .collect())
    }

    async fn set_phone(
        &self,
        user_id: &str,
        app_id: Option<String>,
        phone: &str,
    ) -> Result<UserBalance> {
        let mut ledger = self.inner.write().await;
        let balance = ledger.balance_mut(user_id, app_id);
        balance.phone = Some(phone.to_string());
        balance.updated_at = Utc::now();
        Ok(balance.clone())
    }
}
