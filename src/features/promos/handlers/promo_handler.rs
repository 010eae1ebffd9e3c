use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, MaybeUser};
use crate::features::auth::guards::RequireAdmin;
use crate::features::promos::dtos::{
    CreatePromoDto, PromoListQuery, PromoResponseDto, PromoStatusDto, UpdatePromoDto,
};
use crate::features::promos::services::PromoService;
use crate::shared::types::{ApiResponse, CursorQuery, PaginationQuery};

/// List promos
///
/// Anonymous callers and members only see accepted, active promos that are
/// valid now; their `status` and `active` filters are ignored.
#[utoipa::path(
    get,
    path = "/api/promos",
    params(PromoListQuery, CursorQuery, PaginationQuery),
    responses(
        (status = 200, description = "List of promos", body = ApiResponse<Vec<PromoResponseDto>>),
        (status = 400, description = "Invalid cursor")
    ),
    tag = "promos"
)]
pub async fn list_promos(
    MaybeUser(user): MaybeUser,
    State(service): State<Arc<PromoService>>,
    Query(query): Query<PromoListQuery>,
    Query(cursor): Query<CursorQuery>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<PromoResponseDto>>>> {
    let cursor = cursor.cursor()?;
    let promos = service
        .list(user.as_ref(), query, cursor, &pagination)
        .await?;
    Ok(Json(ApiResponse::success(Some(promos), None, None)))
}

#[utoipa::path(
    get,
    path = "/api/promos/{id}",
    params(
        ("id" = Uuid, Path, description = "Promo ID")
    ),
    responses(
        (status = 200, description = "Promo found", body = ApiResponse<PromoResponseDto>),
        (status = 404, description = "Promo not found")
    ),
    tag = "promos"
)]
pub async fn get_promo(
    State(service): State<Arc<PromoService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PromoResponseDto>>> {
    let promo = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(promo), None, None)))
}

/// Create a promo in `draft` status (admin only)
#[utoipa::path(
    post,
    path = "/api/promos",
    request_body = CreatePromoDto,
    responses(
        (status = 201, description = "Promo created", body = ApiResponse<PromoResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "promos",
    security(("bearer_auth" = []))
)]
pub async fn create_promo(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<PromoService>>,
    AppJson(dto): AppJson<CreatePromoDto>,
) -> Result<(StatusCode, Json<ApiResponse<PromoResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let promo = service.create(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(promo), None, None)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/promos/{id}",
    params(
        ("id" = Uuid, Path, description = "Promo ID")
    ),
    request_body = UpdatePromoDto,
    responses(
        (status = 200, description = "Promo updated", body = ApiResponse<PromoResponseDto>),
        (status = 400, description = "Id mismatch or validation error"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Promo not found")
    ),
    tag = "promos",
    security(("bearer_auth" = []))
)]
pub async fn update_promo(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<PromoService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdatePromoDto>,
) -> Result<Json<ApiResponse<PromoResponseDto>>> {
    if dto.id != id {
        return Err(AppError::invalid_param("id"));
    }

    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let promo = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(promo), None, None)))
}

/// Soft-delete a promo; an unknown id is reported as forbidden
#[utoipa::path(
    delete,
    path = "/api/promos/{id}",
    params(
        ("id" = Uuid, Path, description = "Promo ID")
    ),
    responses(
        (status = 200, description = "Promo deleted"),
        (status = 403, description = "Not allowed or promo not found")
    ),
    tag = "promos",
    security(("bearer_auth" = []))
)]
pub async fn delete_promo(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<PromoService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::ok()))
}

/// Moderate one promo
#[utoipa::path(
    put,
    path = "/api/promos/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Promo ID")
    ),
    request_body = PromoStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<PromoResponseDto>),
        (status = 400, description = "promo_id does not match the path"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Promo not found")
    ),
    tag = "promos",
    security(("bearer_auth" = []))
)]
pub async fn update_promo_status(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<PromoService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<PromoStatusDto>,
) -> Result<Json<ApiResponse<PromoResponseDto>>> {
    if dto.promo_id != Some(id) {
        return Err(AppError::invalid_param("promo_id"));
    }

    let promo = service.update_status(id, dto.status).await?;
    Ok(Json(ApiResponse::success(Some(promo), None, None)))
}

/// Moderate many promos at once; failures are skipped
#[utoipa::path(
    put,
    path = "/api/promos/status",
    request_body = PromoStatusDto,
    responses(
        (status = 200, description = "Statuses updated"),
        (status = 400, description = "Empty promo_ids"),
        (status = 403, description = "Admin access required")
    ),
    tag = "promos",
    security(("bearer_auth" = []))
)]
pub async fn update_promos_statuses(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<PromoService>>,
    AppJson(dto): AppJson<PromoStatusDto>,
) -> Result<Json<ApiResponse<()>>> {
    if dto.promo_ids.is_empty() {
        return Err(AppError::invalid_param("promo_ids"));
    }

    service.update_statuses(&dto.promo_ids, dto.status).await;
    Ok(Json(ApiResponse::ok()))
}
