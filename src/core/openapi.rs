use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::promos::{
    dtos as promos_dtos, handlers as promos_handlers, models as promos_models,
};
use crate::features::transactions::{
    dtos as transactions_dtos, handlers as transactions_handlers, models as transactions_models,
};
use crate::features::verification::{
    dtos as verification_dtos, handlers as verification_handlers,
};
use crate::shared::types::Meta;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::list_client_categories,
        categories_handlers::get_category,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        // Promos
        promos_handlers::list_promos,
        promos_handlers::get_promo,
        promos_handlers::create_promo,
        promos_handlers::update_promo,
        promos_handlers::delete_promo,
        promos_handlers::update_promo_status,
        promos_handlers::update_promos_statuses,
        // Transactions
        transactions_handlers::list_transactions,
        transactions_handlers::get_transaction,
        transactions_handlers::create_transaction,
        transactions_handlers::update_transaction,
        transactions_handlers::delete_transaction,
        transactions_handlers::charge,
        transactions_handlers::discard,
        transactions_handlers::mailing,
        transactions_handlers::list_user_transactions,
        transactions_handlers::get_user_balance,
        // Verification
        verification_handlers::send_verification_sms,
    ),
    components(
        schemas(
            Meta,
            auth::dto::MeResponseDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryTreeDto,
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            promos_models::PromoStatus,
            promos_dtos::PromoResponseDto,
            promos_dtos::CreatePromoDto,
            promos_dtos::UpdatePromoDto,
            promos_dtos::PromoStatusDto,
            transactions_models::TransactionKind,
            transactions_dtos::TransactionResponseDto,
            transactions_dtos::CreateTransactionDto,
            transactions_dtos::UpdateTransactionDto,
            transactions_dtos::ChargeDto,
            transactions_dtos::DiscardDto,
            transactions_dtos::MailingDto,
            transactions_dtos::UserBalanceDto,
            verification_dtos::SendCodeDto,
            verification_dtos::VerificationTokenDto,
        )
    ),
    tags(
        (name = "auth", description = "Identity of the caller"),
        (name = "categories", description = "Category trees (reads are public)"),
        (name = "promos", description = "Promo codes and moderation"),
        (name = "transactions", description = "Point transactions and balances"),
        (name = "verification", description = "SMS verification codes"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Loyalty API",
        version = "0.1.0",
        description = "Categories, promos and point transactions",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
