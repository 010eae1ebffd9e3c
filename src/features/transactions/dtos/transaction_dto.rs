use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::transactions::models::{
    Transaction, TransactionKind, TransactionPatch, UserBalance,
};

/// Response DTO for transaction
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponseDto {
    pub id: Uuid,
    pub user_id: String,
    pub app_id: Option<String>,
    pub value: Decimal,
    pub kind: TransactionKind,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponseDto {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            user_id: t.user_id,
            app_id: t.app_id,
            value: t.value,
            kind: t.kind,
            description: t.description,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Raw transaction row; does not move any balance
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTransactionDto {
    pub user_id: String,

    #[validate(length(min = 1, max = 128))]
    pub app_id: Option<String>,

    pub value: Decimal,

    pub kind: TransactionKind,

    #[validate(length(min = 1, max = 255))]
    pub description: String,
}

/// `id` must repeat the id in the URL
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTransactionDto {
    pub id: Uuid,

    pub value: Decimal,

    pub kind: TransactionKind,

    #[validate(length(min = 1, max = 255))]
    pub description: String,
}

impl From<UpdateTransactionDto> for TransactionPatch {
    fn from(dto: UpdateTransactionDto) -> Self {
        Self {
            value: dto.value,
            kind: dto.kind,
            description: dto.description,
        }
    }
}

/// Manual accrual to one member
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChargeDto {
    pub user_id: String,
    pub value: Decimal,
}

/// Manual deduction confirmed by the member's SMS code
#[derive(Debug, Deserialize, ToSchema)]
pub struct DiscardDto {
    pub user_id: String,
    pub value: Decimal,
    /// Token returned by `POST /api/verification/sms`
    #[serde(default)]
    pub token: String,
    /// Code delivered to the member's phone
    #[serde(default)]
    pub code: String,
}

/// Accrual to every member of an app
#[derive(Debug, Deserialize, ToSchema)]
pub struct MailingDto {
    pub value: Decimal,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MailingQuery {
    /// Defaults to the caller's application
    pub app_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserBalanceDto {
    pub user_id: String,
    pub app_id: Option<String>,
    pub balance: Decimal,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserBalanceDto {
    /// Members without a balance row have a zero balance
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            app_id: None,
            balance: Decimal::ZERO,
            updated_at: None,
        }
    }
}

impl From<UserBalance> for UserBalanceDto {
    fn from(b: UserBalance) -> Self {
        Self {
            user_id: b.user_id,
            app_id: b.app_id,
            balance: b.balance,
            updated_at: Some(b.updated_at),
        }
    }
}
