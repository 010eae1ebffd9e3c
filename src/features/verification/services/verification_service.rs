use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::transactions::stores::BalanceStore;
use crate::features::verification::dtos::{SendCodeDto, VerificationTokenDto};
use crate::features::verification::models::NewVerificationToken;
use crate::features::verification::stores::VerificationStore;
use crate::modules::sms::SmsService;
use crate::shared::validation::VERIFICATION_CODE_REGEX;

const REJECTED: &str = "Invalid or expired verification code";

fn generate_code() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

/// Issues SMS codes and checks them back
pub struct VerificationService {
    store: Arc<dyn VerificationStore>,
    balances: Arc<dyn BalanceStore>,
    sms: Arc<SmsService>,
    code_ttl: Duration,
}

impl VerificationService {
    pub fn new(
        store: Arc<dyn VerificationStore>,
        balances: Arc<dyn BalanceStore>,
        sms: Arc<SmsService>,
        code_ttl: Duration,
    ) -> Self {
        Self {
            store,
            balances,
            sms,
            code_ttl,
        }
    }

    /// Stores the member's phone, then texts a fresh code to it
    pub async fn send_code(
        &self,
        caller: &AuthenticatedUser,
        dto: SendCodeDto,
    ) -> Result<VerificationTokenDto> {
        if !caller.can_act_for(&dto.user_id) {
            return Err(AppError::Forbidden(
                "You do not have permission to verify this user".to_string(),
            ));
        }

        self.balances
            .set_phone(&dto.user_id, caller.app_id.clone(), &dto.phone)
            .await?;

        let ttl = chrono::Duration::from_std(self.code_ttl)
            .map_err(|e| AppError::Internal(format!("Invalid code TTL: {}", e)))?;

        let token = self
            .store
            .save(NewVerificationToken {
                user_id: dto.user_id,
                code: generate_code(),
                expires_at: Utc::now() + ttl,
            })
            .await?;

        self.sms
            .send_verify_sms(&dto.phone, &format!("Verification code: {}", token.code));

        tracing::info!("Verification code issued for user {}", token.user_id);
        Ok(VerificationTokenDto { token: token.token })
    }

    /// Consumes a token and returns the user it was issued to
    pub async fn verify(&self, token: &str, code: &str) -> Result<String> {
        if !VERIFICATION_CODE_REGEX.is_match(code) {
            return Err(AppError::BadRequest(REJECTED.to_string()));
        }
        let token = Uuid::parse_str(token).map_err(|_| AppError::BadRequest(REJECTED.to_string()))?;

        let issued = self
            .store
            .get(token)
            .await?
            .filter(|t| t.is_usable_at(Utc::now()) && t.code == code)
            .ok_or_else(|| AppError::BadRequest(REJECTED.to_string()))?;

        // Lost a race with a concurrent verification of the same token
        if !self.store.mark_used(issued.token).await? {
            return Err(AppError::BadRequest(REJECTED.to_string()));
        }

        Ok(issued.user_id)
    }

    /// Hands a verified token back when the action it confirmed failed
    pub async fn release(&self, token: &str) -> Result<()> {
        match Uuid::parse_str(token) {
            Ok(token) => self.store.release(token).await,
            Err(_) => Ok(()),
        }
    }
}
