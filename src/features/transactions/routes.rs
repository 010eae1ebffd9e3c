use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::transactions::handlers;
use crate::features::transactions::services::TransactionService;

/// Create routes for the transactions feature (mounted behind `auth_middleware`)
pub fn routes(service: Arc<TransactionService>) -> Router {
    Router::new()
        .route(
            "/api/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route("/api/transactions/charge", post(handlers::charge))
        .route("/api/transactions/discard", post(handlers::discard))
        .route("/api/transactions/mailing", post(handlers::mailing))
        .route(
            "/api/transactions/{id}",
            get(handlers::get_transaction)
                .put(handlers::update_transaction)
                .delete(handlers::delete_transaction),
        )
        .route(
            "/api/users/{user_id}/transactions",
            get(handlers::list_user_transactions),
        )
        .route("/api/users/{user_id}/balance", get(handlers::get_user_balance))
        .with_state(service)
}
