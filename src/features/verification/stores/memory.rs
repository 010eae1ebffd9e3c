use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::VerificationStore;
use crate::core::error::Result;
use crate::features::verification::models::{NewVerificationToken, VerificationToken};

#[derive(Default)]
pub struct MemoryVerificationStore {
    tokens: RwLock<Vec<VerificationToken>>,
}

impl MemoryVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every token issued to `user_id`, oldest first
    pub async fn issued_to(&self, user_id: &str) -> Vec<VerificationToken> {
        self.tokens
            .read()
            .await
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl VerificationStore for MemoryVerificationStore {
    async fn save(&self, token: NewVerificationToken) -> Result<VerificationToken> {
        let saved = VerificationToken {
            token: Uuid::new_v4(),
            user_id: token.user_id,
            code: token.code,
            expires_at: token.expires_at,
            used_at: None,
            created_at: Utc::now(),
        };
        self.tokens.write().await.push(saved.clone());
        Ok(saved)
    }

    async fn get(&self, token: Uuid) -> Result<Option<VerificationToken>> {
        Ok(self
            .tokens
            .read()
            .await
            .iter()
            .find(|t| t.token == token)
            .cloned())
    }

    async fn mark_used(&self, token: Uuid) -> Result<bool> {
        let mut tokens = self.tokens.write().await;
        match tokens
            .iter_mut()
            .find(|t| t.token == token && t.used_at.is_none())
        {
            Some(t) => {
                t.used_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn release(&self, token: Uuid) -> Result<()> {
        let mut tokens = self.tokens.write().await;
        if let Some(t) = tokens.iter_mut().find(|t| t.token == token) {
            t.used_at = None;
        }
        Ok(())
    }
}
