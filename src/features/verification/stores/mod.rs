mod pg_verification_store;

#[cfg(test)]
pub mod memory;

pub use pg_verification_store::PgVerificationStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::verification::models::{NewVerificationToken, VerificationToken};

#[async_trait]
pub trait VerificationStore: Send + Sync {
    async fn save(&self, token: NewVerificationToken) -> Result<VerificationToken>;

    async fn get(&self, token: Uuid) -> Result<Option<VerificationToken>>;

    /// Marks the token used; false if it was already used or does not exist
    async fn mark_used(&self, token: Uuid) -> Result<bool>;

    /// Makes a used token usable again
    async fn release(&self, token: Uuid) -> Result<()>;
}
