use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Point balance of one app member.
///
/// Rows are created on first accrual or phone verification; `balance` never
/// drops below zero.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UserBalance {
    pub user_id: String,
    pub app_id: Option<String>,
    pub phone: Option<String>,
    pub balance: Decimal,
    pub sms_notify: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
