use crate::core::error::Result;
use crate::features::auth::dto::MeResponseDto;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::types::ApiResponse;
use axum::Json;

/// Identity of the caller as read from the bearer token
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user retrieved successfully", body = ApiResponse<MeResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(user: AuthenticatedUser) -> Result<Json<ApiResponse<MeResponseDto>>> {
    Ok(Json(ApiResponse::success(Some(user.into()), None, None)))
}

#[cfg(test)]
mod tests {
    use crate::features::auth::routes;
    use crate::shared::test_helpers::{with_app_admin_auth, TEST_APP_ID};
    use axum::http::StatusCode;
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_get_me_returns_caller() {
        let server = TestServer::new(with_app_admin_auth(routes::routes())).unwrap();

        let response = server.get("/api/auth/me").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["app_id"], TEST_APP_ID);
        assert_eq!(body["data"]["is_admin"], true);
    }

    #[tokio::test]
    async fn test_get_me_without_user_is_unauthorized() {
        let server = TestServer::new(routes::routes()).unwrap();

        let response = server.get("/api/auth/me").await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }
}
