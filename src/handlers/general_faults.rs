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
    services::general_faults::{CreateGeneralFaultRequest, GeneralFaultFilter, GeneralFaultView},
    ApiResponse, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_faults))
        .route("/:id", get(get_fault))
        .route("/", post(create_fault))
        .route("/:id", delete(delete_fault))
        .with_auth()
}

/// List general faults with optional line / impact / date-range filters
#[utoipa::path(
    get,
    path = "/api/general-faults",
    params(
        ("line" = Option<i32>, Query, description = "Faults that hit this production line"),
        ("production_impact" = Option<bool>, Query, description = "Filter by production impact"),
        ("start" = Option<String>, Query, description = "Range start (RFC 3339)"),
        ("end" = Option<String>, Query, description = "Range end (RFC 3339)"),
    ),
    responses(
        (status = 200, description = "Faults retrieved successfully"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "General faults"
)]
pub async fn list_faults(
    State(state): State<AppState>,
    Query(filter): Query<GeneralFaultFilter>,
) -> Result<Json<ApiResponse<Vec<GeneralFaultView>>>, ServiceError> {
    let faults = state.services.general_faults.list(filter).await?;
    Ok(Json(ApiResponse::success(faults)))
}

/// A single fault with lines, files and reporter
pub async fn get_fault(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<GeneralFaultView>>, ServiceError> {
    let fault = state.services.general_faults.get(id).await?;
    Ok(Json(ApiResponse::success(fault)))
}

/// Report a general fault. Line associations, file attachments and
/// spare-part deductions commit atomically with the fault row; any
/// insufficient stock rolls the whole report back with 422.
#[utoipa::path(
    post,
    path = "/api/general-faults",
    responses(
        (status = 201, description = "Fault created successfully"),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "General faults"
)]
pub async fn create_fault(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateGeneralFaultRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GeneralFaultView>>), ServiceError> {
    let fault = state
        .services
        .general_faults
        .create(auth_user.user_id, Some(auth_user.email.clone()), request)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(fault))))
}

/// Delete a fault and its dependent rows
pub async fn delete_fault(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    state.services.general_faults.delete(id).await?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": true }),
    )))
}
