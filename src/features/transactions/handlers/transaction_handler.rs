use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::transactions::dtos::{
    ChargeDto, CreateTransactionDto, DiscardDto, MailingDto, MailingQuery,
    TransactionResponseDto, UpdateTransactionDto, UserBalanceDto,
};
use crate::features::transactions::services::TransactionService;
use crate::shared::types::{ApiResponse, CursorQuery, PaginationQuery};

/// List transactions (admin only)
///
/// `since` returns rows updated after the given unix millis, oldest update
/// first; `after` and `before` page around an anchor transaction.
#[utoipa::path(
    get,
    path = "/api/transactions",
    params(CursorQuery, PaginationQuery),
    responses(
        (status = 200, description = "List of transactions", body = ApiResponse<Vec<TransactionResponseDto>>),
        (status = 400, description = "Invalid cursor"),
        (status = 403, description = "Admin access required")
    ),
    tag = "transactions",
    security(("bearer_auth" = []))
)]
pub async fn list_transactions(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<TransactionService>>,
    Query(cursor): Query<CursorQuery>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<TransactionResponseDto>>>> {
    let transactions = service.list(cursor.cursor()?, &pagination).await?;
    Ok(Json(ApiResponse::success(Some(transactions), None, None)))
}

#[utoipa::path(
    get,
    path = "/api/transactions/{id}",
    params(
        ("id" = Uuid, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction found", body = ApiResponse<TransactionResponseDto>),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Transaction not found")
    ),
    tag = "transactions",
    security(("bearer_auth" = []))
)]
pub async fn get_transaction(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<TransactionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransactionResponseDto>>> {
    let transaction = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(transaction), None, None)))
}

/// Record a raw transaction without moving any balance (admin only)
#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = CreateTransactionDto,
    responses(
        (status = 201, description = "Transaction created", body = ApiResponse<TransactionResponseDto>),
        (status = 400, description = "Invalid user id, value or field"),
        (status = 403, description = "Admin access required")
    ),
    tag = "transactions",
    security(("bearer_auth" = []))
)]
pub async fn create_transaction(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<TransactionService>>,
    AppJson(dto): AppJson<CreateTransactionDto>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let transaction = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(transaction), None, None)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/transactions/{id}",
    params(
        ("id" = Uuid, Path, description = "Transaction ID")
    ),
    request_body = UpdateTransactionDto,
    responses(
        (status = 200, description = "Transaction updated", body = ApiResponse<TransactionResponseDto>),
        (status = 400, description = "Id mismatch or validation error"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Transaction not found")
    ),
    tag = "transactions",
    security(("bearer_auth" = []))
)]
pub async fn update_transaction(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<TransactionService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateTransactionDto>,
) -> Result<Json<ApiResponse<TransactionResponseDto>>> {
    if dto.id != id {
        return Err(AppError::invalid_param("id"));
    }

    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let transaction = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(transaction), None, None)))
}

#[utoipa::path(
    delete,
    path = "/api/transactions/{id}",
    params(
        ("id" = Uuid, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction deleted"),
        (status = 403, description = "Not allowed or transaction not found")
    ),
    tag = "transactions",
    security(("bearer_auth" = []))
)]
pub async fn delete_transaction(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<TransactionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::ok()))
}

/// Credit points to a member (admin only)
#[utoipa::path(
    post,
    path = "/api/transactions/charge",
    request_body = ChargeDto,
    responses(
        (status = 200, description = "Points accrued", body = ApiResponse<TransactionResponseDto>),
        (status = 400, description = "Invalid user id or value"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "transactions",
    security(("bearer_auth" = []))
)]
pub async fn charge(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<TransactionService>>,
    AppJson(dto): AppJson<ChargeDto>,
) -> Result<Json<ApiResponse<TransactionResponseDto>>> {
    let transaction = service.charge(&user, dto).await?;
    Ok(Json(ApiResponse::success(Some(transaction), None, None)))
}

/// Deduct points from a member
///
/// Needs the token from `POST /api/verification/sms` and the code the member
/// received.
#[utoipa::path(
    post,
    path = "/api/transactions/discard",
    request_body = DiscardDto,
    responses(
        (status = 200, description = "Points deducted"),
        (status = 400, description = "Missing code, bad code, or insufficient balance"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Member has no balance")
    ),
    tag = "transactions",
    security(("bearer_auth" = []))
)]
pub async fn discard(
    user: AuthenticatedUser,
    State(service): State<Arc<TransactionService>>,
    AppJson(dto): AppJson<DiscardDto>,
) -> Result<Json<ApiResponse<()>>> {
    service.discard(&user, dto).await?;
    Ok(Json(ApiResponse::ok()))
}

/// Credit every member of an app (admin only)
///
/// Responds once the request is validated; accruals and SMS notifications
/// run in the background.
#[utoipa::path(
    post,
    path = "/api/transactions/mailing",
    params(MailingQuery),
    request_body = MailingDto,
    responses(
        (status = 201, description = "Mailing started"),
        (status = 400, description = "Empty description or no app"),
        (status = 403, description = "Admin access required")
    ),
    tag = "transactions",
    security(("bearer_auth" = []))
)]
pub async fn mailing(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<TransactionService>>,
    Query(query): Query<MailingQuery>,
    AppJson(dto): AppJson<MailingDto>,
) -> Result<(StatusCode, Json<ApiResponse<()>>)> {
    service.mailing(&user, query.app_id, dto)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok())))
}

/// Transactions of one member, newest first
#[utoipa::path(
    get,
    path = "/api/users/{user_id}/transactions",
    params(
        ("user_id" = String, Path, description = "Member ID"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Member transactions", body = ApiResponse<Vec<TransactionResponseDto>>),
        (status = 400, description = "Invalid user id"),
        (status = 403, description = "Members may only read their own transactions")
    ),
    tag = "transactions",
    security(("bearer_auth" = []))
)]
pub async fn list_user_transactions(
    user: AuthenticatedUser,
    State(service): State<Arc<TransactionService>>,
    Path(user_id): Path<String>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<TransactionResponseDto>>>> {
    let transactions = service.list_by_user(&user, &user_id, &pagination).await?;
    Ok(Json(ApiResponse::success(Some(transactions), None, None)))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/balance",
    params(
        ("user_id" = String, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Current balance", body = ApiResponse<UserBalanceDto>),
        (status = 400, description = "Invalid user id"),
        (status = 403, description = "Members may only read their own balance")
    ),
    tag = "transactions",
    security(("bearer_auth" = []))
)]
pub async fn get_user_balance(
    user: AuthenticatedUser,
    State(service): State<Arc<TransactionService>>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<UserBalanceDto>>> {
    let balance = service.balance(&user, &user_id).await?;
    Ok(Json(ApiResponse::success(Some(balance), None, None)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum::Router;
    use axum_test::TestServer;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use uuid::Uuid;

    use crate::features::transactions::routes;
    use crate::features::transactions::services::TransactionService;
    use crate::features::transactions::stores::memory::MemoryLedger;
    use crate::features::verification::stores::memory::MemoryVerificationStore;
    use crate::features::verification::VerificationService;
    use crate::modules::sms::SmsService;
    use crate::shared::test_helpers::{
        with_app_admin_auth, with_member_auth, RecordingSmsSender, TEST_APP_ID, TEST_USER_ID,
    };

    fn router(ledger: Arc<MemoryLedger>) -> Router {
        let sms = Arc::new(SmsService::new(Arc::new(RecordingSmsSender::default()), true));
        let verification = Arc::new(VerificationService::new(
            Arc::new(MemoryVerificationStore::new()),
            ledger.clone(),
            sms.clone(),
            Duration::from_secs(300),
        ));
        routes::routes(Arc::new(TransactionService::new(
            ledger.clone(),
            ledger,
            verification,
            sms,
        )))
    }

    fn admin_server(ledger: Arc<MemoryLedger>) -> TestServer {
        TestServer::new(with_app_admin_auth(router(ledger))).unwrap()
    }

    async fn create(server: &TestServer, description: &str) -> String {
        let response = server
            .post("/api/transactions")
            .json(&json!({
                "user_id": TEST_USER_ID,
                "value": "10",
                "kind": "accrual",
                "description": description
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body: Value = response.json();
        body["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_create_and_list_newest_first() {
        let server = admin_server(Arc::new(MemoryLedger::new()));
        create(&server, "first").await;
        tokio::time::sleep(Duration::from_millis(2)).await;
        create(&server, "second").await;

        let response = server.get("/api/transactions").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["data"][0]["description"], "second");
        assert_eq!(body["data"][1]["description"], "first");
    }

    #[tokio::test]
    async fn test_list_after_anchor() {
        let server = admin_server(Arc::new(MemoryLedger::new()));
        let first = create(&server, "first").await;
        tokio::time::sleep(Duration::from_millis(2)).await;
        create(&server, "second").await;

        let response = server
            .get("/api/transactions")
            .add_query_param("after", &first)
            .await;

        let body: Value = response.json();
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["description"], "second");
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_user_id() {
        let server = admin_server(Arc::new(MemoryLedger::new()));

        let response = server
            .post("/api/transactions")
            .json(&json!({
                "user_id": "not-a-user",
                "value": "10",
                "kind": "accrual",
                "description": "x"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid parameter: user_id");
    }

    #[tokio::test]
    async fn test_update_with_mismatched_id_is_rejected() {
        let server = admin_server(Arc::new(MemoryLedger::new()));
        let id = create(&server, "first").await;

        let response = server
            .put(&format!("/api/transactions/{}", id))
            .json(&json!({
                "id": Uuid::new_v4(),
                "value": "5",
                "kind": "deduction",
                "description": "fixed"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_twice_is_forbidden() {
        let server = admin_server(Arc::new(MemoryLedger::new()));
        let id = create(&server, "first").await;

        let first = server.delete(&format!("/api/transactions/{}", id)).await;
        assert_eq!(first.status_code(), StatusCode::OK);

        let second = server.delete(&format!("/api/transactions/{}", id)).await;
        assert_eq!(second.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_member_cannot_list_all_transactions() {
        let server = TestServer::new(with_member_auth(router(Arc::new(MemoryLedger::new()))))
            .unwrap();

        let response = server.get("/api/transactions").await;

        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_charge_then_read_balance() {
        let ledger = Arc::new(MemoryLedger::new());
        let server = admin_server(ledger);

        let charged = server
            .post("/api/transactions/charge")
            .json(&json!({ "user_id": TEST_USER_ID, "value": "42.5" }))
            .await;
        assert_eq!(charged.status_code(), StatusCode::OK);

        let response = server
            .get(&format!("/api/users/{}/balance", TEST_USER_ID))
            .await;
        let body: Value = response.json();
        assert_eq!(body["data"]["balance"], "42.5");
        assert_eq!(body["data"]["app_id"], TEST_APP_ID);
    }

    #[tokio::test]
    async fn test_member_cannot_charge() {
        let ledger = Arc::new(MemoryLedger::new());
        let server = TestServer::new(with_member_auth(router(ledger.clone()))).unwrap();

        let response = server
            .post("/api/transactions/charge")
            .json(&json!({ "user_id": TEST_USER_ID, "value": "1000000" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
        let balance = admin_server(ledger)
            .get(&format!("/api/users/{}/balance", TEST_USER_ID))
            .await;
        let body: Value = balance.json();
        assert_eq!(body["data"]["balance"], "0");
    }

    #[tokio::test]
    async fn test_charge_rejects_sub_cent_value() {
        let server = admin_server(Arc::new(MemoryLedger::new()));

        let response = server
            .post("/api/transactions/charge")
            .json(&json!({ "user_id": TEST_USER_ID, "value": "0.001" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid parameter: value");
    }

    #[tokio::test]
    async fn test_discard_without_code_is_rejected() {
        let server = admin_server(Arc::new(MemoryLedger::new()));

        let response = server
            .post("/api/transactions/discard")
            .json(&json!({ "user_id": TEST_USER_ID, "value": "1", "token": "t" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid parameter: code or token");
    }

    #[tokio::test]
    async fn test_mailing_responds_created() {
        let ledger = Arc::new(MemoryLedger::new());
        ledger
            .add_member(TEST_USER_ID, TEST_APP_ID, Decimal::ZERO, None)
            .await;
        let server = admin_server(ledger);

        let response = server
            .post("/api/transactions/mailing")
            .json(&json!({ "value": "5", "description": "Bonus" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["message"], "OK");
    }

    #[tokio::test]
    async fn test_mailing_requires_description() {
        let server = admin_server(Arc::new(MemoryLedger::new()));

        let response = server
            .post("/api/transactions/mailing")
            .add_query_param("app_id", TEST_APP_ID)
            .json(&json!({ "value": "5" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid parameter: description");
    }

    #[tokio::test]
    async fn test_member_reads_own_transactions() {
        let ledger = Arc::new(MemoryLedger::new());
        admin_server(ledger.clone())
            .post("/api/transactions/charge")
            .json(&json!({ "user_id": TEST_USER_ID, "value": "3" }))
            .await;
        let server = TestServer::new(with_member_auth(router(ledger))).unwrap();

        let response = server
            .get(&format!("/api/users/{}/transactions", TEST_USER_ID))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["kind"], "accrual");
    }
}
