use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::transactions::dtos::{
    ChargeDto, CreateTransactionDto, DiscardDto, MailingDto, TransactionResponseDto,
    UpdateTransactionDto, UserBalanceDto,
};
use crate::features::transactions::models::NewTransaction;
use crate::features::transactions::stores::{BalanceStore, TransactionStore};
use crate::features::verification::VerificationService;
use crate::modules::sms::SmsService;
use crate::shared::constants::{
    DESCRIPTION_ADMIN_ACCRUAL, DESCRIPTION_MANUAL_ACCRUAL, DESCRIPTION_MANUAL_DEDUCTION,
};
use crate::shared::types::{ListCursor, PaginationQuery};
use crate::shared::validation::is_valid_user_id;

fn check_user_id(user_id: &str) -> Result<()> {
    if !is_valid_user_id(user_id) {
        return Err(AppError::invalid_param("user_id"));
    }
    Ok(())
}

fn check_value(value: Decimal) -> Result<()> {
    // Balances are NUMERIC(20, 2)
    if value <= Decimal::ZERO || value.normalize().scale() > 2 {
        return Err(AppError::invalid_param("value"));
    }
    Ok(())
}

/// Members may only look at their own ledger
fn check_owner(caller: &AuthenticatedUser, user_id: &str) -> Result<()> {
    if !caller.can_act_for(user_id) {
        return Err(AppError::Forbidden(
            "You do not have permission to view this user".to_string(),
        ));
    }
    Ok(())
}

/// Service for transactions and balances
pub struct TransactionService {
    store: Arc<dyn TransactionStore>,
    balances: Arc<dyn BalanceStore>,
    verification: Arc<VerificationService>,
    sms: Arc<SmsService>,
}

impl TransactionService {
    pub fn new(
        store: Arc<dyn TransactionStore>,
        balances: Arc<dyn BalanceStore>,
        verification: Arc<VerificationService>,
        sms: Arc<SmsService>,
    ) -> Self {
        Self {
            store,
            balances,
            verification,
            sms,
        }
    }

    pub async fn list(
        &self,
        cursor: ListCursor,
        pagination: &PaginationQuery,
    ) -> Result<Vec<TransactionResponseDto>> {
        let (offset, limit) = cursor.window(pagination);

        let transactions = self
            .store
            .list(cursor, offset, limit)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list transactions: {:?}", e);
                e
            })?;

        Ok(transactions.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<TransactionResponseDto> {
        self.store
            .get(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Transaction '{}' not found", id)))
    }

    /// Records a raw row; balances are left alone
    pub async fn create(&self, dto: CreateTransactionDto) -> Result<TransactionResponseDto> {
        check_user_id(&dto.user_id)?;
        check_value(dto.value)?;

        let transaction = self
            .store
            .save(NewTransaction {
                user_id: dto.user_id,
                app_id: dto.app_id,
                value: dto.value,
                kind: dto.kind,
                description: dto.description,
            })
            .await?;

        tracing::info!("Transaction created: id={}", transaction.id);
        Ok(transaction.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateTransactionDto,
    ) -> Result<TransactionResponseDto> {
        check_value(dto.value)?;

        let transaction = self
            .store
            .update(id, dto.into())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Transaction '{}' not found", id)))?;

        tracing::info!("Transaction updated: id={}", transaction.id);
        Ok(transaction.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::Forbidden(
                "You do not have permission to delete this transaction".to_string(),
            ));
        }

        tracing::info!("Transaction deleted: id={}", id);
        Ok(())
    }

    /// Manual accrual to one member
    pub async fn charge(
        &self,
        caller: &AuthenticatedUser,
        dto: ChargeDto,
    ) -> Result<TransactionResponseDto> {
        check_user_id(&dto.user_id)?;
        check_value(dto.value)?;

        let accrual = NewTransaction::accrual(dto.user_id, dto.value, DESCRIPTION_MANUAL_ACCRUAL)
            .with_app(caller.app_id.clone());
        let (transaction, balance) = self.store.accrue(accrual).await?;

        tracing::info!(
            "Charged {} to user {}, balance {}",
            transaction.value,
            transaction.user_id,
            balance.balance
        );
        Ok(transaction.into())
    }

    /// Manual deduction confirmed with the code texted to the member
    pub async fn discard(&self, caller: &AuthenticatedUser, dto: DiscardDto) -> Result<()> {
        if dto.code.is_empty() || dto.token.is_empty() {
            return Err(AppError::invalid_param("code or token"));
        }
        check_user_id(&dto.user_id)?;
        check_value(dto.value)?;

        let balance = self
            .balances
            .get(&dto.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", dto.user_id)))?;

        if balance.balance < dto.value {
            return Err(AppError::invalid_param("value"));
        }

        let verified_user = self.verification.verify(&dto.token, &dto.code).await?;
        if verified_user != dto.user_id {
            return Err(AppError::invalid_param("user_id"));
        }

        let deduction =
            NewTransaction::deduction(dto.user_id, dto.value, DESCRIPTION_MANUAL_DEDUCTION)
                .with_app(caller.app_id.clone());
        let (transaction, balance) = match self.store.deduct(deduction).await {
            Ok(moved) => moved,
            Err(err) => {
                if let Err(release_err) = self.verification.release(&dto.token).await {
                    tracing::error!("Failed to release verification token: {}", release_err);
                }
                return Err(err);
            }
        };

        tracing::info!(
            "Discarded {} from user {}, balance {}",
            transaction.value,
            transaction.user_id,
            balance.balance
        );
        Ok(())
    }

    /// Accrues `dto.value` to every member of the app in the background.
    ///
    /// Validation happens before spawning; the task resolves to the number of
    /// members credited.
    pub fn mailing(
        &self,
        caller: &AuthenticatedUser,
        app_id: Option<String>,
        dto: MailingDto,
    ) -> Result<JoinHandle<usize>> {
        if dto.description.trim().is_empty() {
            return Err(AppError::invalid_param("description"));
        }
        check_value(dto.value)?;

        let app_id = app_id
            .filter(|a| !a.is_empty())
            .or_else(|| caller.app_id.clone())
            .ok_or_else(|| AppError::invalid_param("app_id"))?;

        if !caller.is_system_admin() && caller.app_id.as_deref() != Some(app_id.as_str()) {
            return Err(AppError::Forbidden(
                "You do not have permission to credit members of this app".to_string(),
            ));
        }

        let store = self.store.clone();
        let balances = self.balances.clone();
        let sms = self.sms.clone();
        let text = format!("{}: +{}", dto.description, dto.value.round_dp(0));

        Ok(tokio::spawn(async move {
            let members = match balances.list_by_app(&app_id).await {
                Ok(members) => members,
                Err(e) => {
                    tracing::error!("Failed to load members of app {}: {:?}", app_id, e);
                    return 0;
                }
            };

            let mut credited = 0;
            for member in &members {
                if !is_valid_user_id(&member.user_id) {
                    tracing::warn!("Skipping malformed user id {:?}", member.user_id);
                    continue;
                }

                let accrual = NewTransaction::accrual(
                    member.user_id.as_str(),
                    dto.value,
                    DESCRIPTION_ADMIN_ACCRUAL,
                )
                .with_app(Some(app_id.clone()));

                if let Err(e) = store.accrue(accrual).await {
                    tracing::error!("Failed to accrue to user {}: {:?}", member.user_id, e);
                    continue;
                }
                credited += 1;

                match member.phone.as_deref() {
                    Some(phone) if member.sms_notify => {
                        sms.send_verify_sms(phone, &text);
                    }
                    _ => {}
                }
            }

            tracing::info!(
                "Mailing accrued {} to {}/{} members of app {}",
                dto.value,
                credited,
                members.len(),
                app_id
            );
            credited
        }))
    }

    pub async fn list_by_user(
        &self,
        caller: &AuthenticatedUser,
        user_id: &str,
        pagination: &PaginationQuery,
    ) -> Result<Vec<TransactionResponseDto>> {
        check_user_id(user_id)?;
        check_owner(caller, user_id)?;

        let transactions = self
            .store
            .list_by_user(user_id, pagination.offset(), pagination.limit())
            .await?;

        Ok(transactions.into_iter().map(Into::into).collect())
    }

    pub async fn balance(&self, caller: &AuthenticatedUser, user_id: &str) -> Result<UserBalanceDto> {
        check_user_id(user_id)?;
        check_owner(caller, user_id)?;

        Ok(self
            .balances
            .get(user_id)
            .await?
            .map(Into::into)
            .unwrap_or_else(|| UserBalanceDto::empty(user_id)))
    }
}
