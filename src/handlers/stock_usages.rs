use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};

use crate::{
    auth::{AuthRouterExt, AuthUser},
    errors::ServiceError,
    services::stocks::{RecordUsageRequest, StockUsageView, UsageFilter},
    ApiResponse, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_usages))
        .route("/:id", get(get_usage))
        .route("/", post(record_usage))
        .route("/:id", delete(delete_usage))
        .with_auth()
}

/// Consumption ledger, filterable by stock or user
#[utoipa::path(
    get,
    path = "/api/stock-usages",
    params(
        ("stock_id" = Option<i32>, Query, description = "Filter by stock"),
        ("user_id" = Option<i32>, Query, description = "Filter by user"),
    ),
    responses(
        (status = 200, description = "Usages retrieved successfully"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Stocks"
)]
pub async fn list_usages(
    State(state): State<AppState>,
    Query(filter): Query<UsageFilter>,
) -> Result<Json<ApiResponse<Vec<StockUsageView>>>, ServiceError> {
    let usages = state.services.stocks.list_usages(filter).await?;
    Ok(Json(ApiResponse::success(usages)))
}

/// A single ledger entry
pub async fn get_usage(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<StockUsageView>>, ServiceError> {
    let usage = state.services.stocks.get_usage(id).await?;
    Ok(Json(ApiResponse::success(usage)))
}

/// Record a consumption. Fails with 422 and leaves the stock untouched when
/// the requested amount exceeds what is on hand.
#[utoipa::path(
    post,
    path = "/api/stock-usages",
    responses(
        (status = 201, description = "Usage recorded successfully"),
        (status = 404, description = "Stock not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Stocks"
)]
pub async fn record_usage(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<RecordUsageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StockUsageView>>), ServiceError> {
    let usage = state
        .services
        .stocks
        .record_usage(auth_user.user_id, Some(auth_user.email.clone()), request)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(usage))))
}

/// Delete a ledger entry, restoring the consumed amount to the stock
pub async fn delete_usage(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    state.services.stocks.delete_usage(id).await?;
    Ok(Json(ApiResponse::success(serde_json::json!({
        "deleted": true,
        "message": "Usage deleted, stock restored"
    }))))
}
