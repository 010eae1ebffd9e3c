use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::promos::handlers;
use crate::features::promos::services::PromoService;

/// Create routes for the promos feature (mounted behind `optional_auth_middleware`)
pub fn routes(service: Arc<PromoService>) -> Router {
    Router::new()
        .route(
            "/api/promos",
            get(handlers::list_promos).post(handlers::create_promo),
        )
        // Bulk status route must come before {id}
        .route("/api/promos/status", put(handlers::update_promos_statuses))
        .route(
            "/api/promos/{id}",
            get(handlers::get_promo)
                .put(handlers::update_promo)
                .delete(handlers::delete_promo),
        )
        .route(
            "/api/promos/{id}/status",
            put(handlers::update_promo_status),
        )
        .with_state(service)
}
