use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::verification::handlers;
use crate::features::verification::services::VerificationService;

pub fn routes(service: Arc<VerificationService>) -> Router {
    Router::new()
        .route("/api/verification/sms", post(handlers::send_verification_sms))
        .with_state(service)
}
