use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};

use crate::{
    auth::AuthRouterExt,
    entities::stock,
    errors::ServiceError,
    services::stocks::{CreateStockRequest, UpdateStockRequest},
    ApiResponse, AppState,
};

pub fn routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_stocks))
        .route("/:id", get(get_stock))
        .with_auth();

    let admin = Router::new()
        .route("/", post(create_stock))
        .route("/:id", put(update_stock))
        .route("/:id", delete(delete_stock))
        .with_admin();

    read.merge(admin)
}

/// List all stock items, name ascending
#[utoipa::path(
    get,
    path = "/api/stocks",
    responses(
        (status = 200, description = "Stocks retrieved successfully"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Stocks"
)]
pub async fn list_stocks(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<stock::Model>>>, ServiceError> {
    let stocks = state.services.stocks.list().await?;
    Ok(Json(ApiResponse::success(stocks)))
}

/// Get a single stock item
pub async fn get_stock(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<stock::Model>>, ServiceError> {
    let stock = state.services.stocks.get(id).await?;
    Ok(Json(ApiResponse::success(stock)))
}

/// Create a stock item (admin only)
#[utoipa::path(
    post,
    path = "/api/stocks",
    responses(
        (status = 201, description = "Stock created successfully"),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Stocks"
)]
pub async fn create_stock(
    State(state): State<AppState>,
    Json(request): Json<CreateStockRequest>,
) -> Result<(StatusCode, Json<ApiResponse<stock::Model>>), ServiceError> {
    let stock = state.services.stocks.create(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(stock))))
}

/// Update a stock item (admin only)
pub async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateStockRequest>,
) -> Result<Json<ApiResponse<stock::Model>>, ServiceError> {
    let stock = state.services.stocks.update(id, request).await?;
    Ok(Json(ApiResponse::success(stock)))
}

/// Delete a stock item and its ledger (admin only)
pub async fn delete_stock(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    state.services.stocks.delete(id).await?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": true }),
    )))
}
