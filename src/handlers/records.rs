use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;

use crate::{
    auth::{AuthRouterExt, AuthUser},
    errors::ServiceError,
    services::records::{CreateRecordRequest, FaultRecordView, UpdateRecordRequest},
    ApiResponse, AppState,
};

pub fn routes() -> Router<AppState> {
    let authenticated = Router::new()
        .route("/", get(list_records))
        .route("/my", get(my_records))
        .route("/", post(create_record))
        .with_auth();

    let admin = Router::new()
        .route("/:id", put(update_record))
        .route("/:id", delete(delete_record))
        .with_admin();

    authenticated.merge(admin)
}

#[derive(Debug, Deserialize)]
pub struct RecordListQuery {
    pub motor_id: Option<i32>,
}

/// List fault records. Scoped to one motor for any authenticated user; the
/// unfiltered plant-wide list is admin only.
#[utoipa::path(
    get,
    path = "/api/records",
    params(("motor_id" = Option<i32>, Query, description = "Restrict to one motor")),
    responses(
        (status = 200, description = "Records retrieved successfully"),
        (status = 403, description = "Unscoped listing requires admin", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Records"
)]
pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<RecordListQuery>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<FaultRecordView>>>, ServiceError> {
    if query.motor_id.is_none() && !auth_user.is_admin() {
        return Err(ServiceError::Forbidden(
            "Only admins can list all fault records".to_string(),
        ));
    }

    let records = state.services.records.list(query.motor_id).await?;
    Ok(Json(ApiResponse::success(records)))
}

/// The caller's own fault records
pub async fn my_records(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<FaultRecordView>>>, ServiceError> {
    let records = state
        .services
        .records
        .list_for_user(auth_user.user_id)
        .await?;
    Ok(Json(ApiResponse::success(records)))
}

/// Log a new fault record
#[utoipa::path(
    post,
    path = "/api/records",
    responses(
        (status = 201, description = "Record created successfully"),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Records"
)]
pub async fn create_record(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateRecordRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FaultRecordView>>), ServiceError> {
    let record = state
        .services
        .records
        .create(auth_user.user_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(record))))
}

/// Update a fault record (admin only)
pub async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateRecordRequest>,
) -> Result<Json<ApiResponse<FaultRecordView>>, ServiceError> {
    let record = state.services.records.update(id, request).await?;
    Ok(Json(ApiResponse::success(record)))
}

/// Delete a fault record (admin only)
pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    state.services.records.delete(id).await?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": true }),
    )))
}
