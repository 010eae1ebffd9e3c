use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Direction of a balance movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "transaction_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Accrual,
    Deduction,
}

/// Database model for transaction
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub app_id: Option<String>,
    pub value: Decimal,
    pub kind: TransactionKind,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: String,
    pub app_id: Option<String>,
    pub value: Decimal,
    pub kind: TransactionKind,
    pub description: String,
}

impl NewTransaction {
    pub fn accrual(user_id: impl Into<String>, value: Decimal, description: &str) -> Self {
        Self {
            user_id: user_id.into(),
            app_id: None,
            value,
            kind: TransactionKind::Accrual,
            description: description.to_string(),
        }
    }

    pub fn deduction(user_id: impl Into<String>, value: Decimal, description: &str) -> Self {
        Self {
            kind: TransactionKind::Deduction,
            ..Self::accrual(user_id, value, description)
        }
    }

    pub fn with_app(mut self, app_id: Option<String>) -> Self {
        self.app_id = app_id;
        self
    }
}

/// Replacement values for a raw transaction row
#[derive(Debug, Clone)]
pub struct TransactionPatch {
    pub value: Decimal,
    pub kind: TransactionKind,
    pub description: String,
}
