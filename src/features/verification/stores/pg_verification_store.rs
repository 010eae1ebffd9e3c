use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::VerificationStore;
use crate::core::error::Result;
use crate::features::verification::models::{NewVerificationToken, VerificationToken};

const COLUMNS: &str = "token, user_id, code, expires_at, used_at, created_at";

pub struct PgVerificationStore {
    pool: PgPool,
}

impl PgVerificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationStore for PgVerificationStore {
    async fn save(&self, token: NewVerificationToken) -> Result<VerificationToken> {
        let saved = sqlx::query_as::<_, VerificationToken>(&format!(
            r#"
            INSERT INTO verification_tokens (token, user_id, code, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&token.user_id)
        .bind(&token.code)
        .bind(token.expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }

    async fn get(&self, token: Uuid) -> Result<Option<VerificationToken>> {
        let found = sqlx::query_as::<_, VerificationToken>(&format!(
            "SELECT {COLUMNS} FROM verification_tokens WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found)
    }

    async fn mark_used(&self, token: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE verification_tokens SET used_at = NOW() WHERE token = $1 AND used_at IS NULL",
        )
        .bind(token)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn release(&self, token: Uuid) -> Result<()> {
        sqlx::query("UPDATE verification_tokens SET used_at = NULL WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
