use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// One-time SMS code handed out for confirming a deduction
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct VerificationToken {
    pub token: Uuid,
    pub user_id: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl VerificationToken {
    pub fn is_usable_at(&self, at: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > at
    }
}

#[derive(Debug, Clone)]
pub struct NewVerificationToken {
    pub user_id: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}
