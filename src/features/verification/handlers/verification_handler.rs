use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::verification::dtos::{SendCodeDto, VerificationTokenDto};
use crate::features::verification::services::VerificationService;
use crate::shared::types::ApiResponse;

/// Text a verification code to a member
///
/// Stores the phone on the member's balance row. Members may only request
/// codes for themselves. The returned token is sent
/// back together with the code when confirming a deduction.
#[utoipa::path(
    post,
    path = "/api/verification/sms",
    request_body = SendCodeDto,
    responses(
        (status = 200, description = "Code sent", body = ApiResponse<VerificationTokenDto>),
        (status = 400, description = "Invalid user id or phone"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Members may only verify themselves")
    ),
    tag = "verification",
    security(("bearer_auth" = []))
)]
pub async fn send_verification_sms(
    user: AuthenticatedUser,
    State(service): State<Arc<VerificationService>>,
    AppJson(dto): AppJson<SendCodeDto>,
) -> Result<Json<ApiResponse<VerificationTokenDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let token = service.send_code(&user, dto).await?;
    Ok(Json(ApiResponse::success(Some(token), None, None)))
}
