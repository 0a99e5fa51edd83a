use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::info;

use crate::{
    auth::AuthRouterExt, entities::fault_type, errors::ServiceError, ApiResponse, AppState,
};

pub fn routes() -> Router<AppState> {
    let read = Router::new().route("/", get(list_fault_types)).with_auth();

    let admin = Router::new()
        .route("/", post(create_fault_type))
        .route("/:id", put(update_fault_type))
        .route("/:id", delete(delete_fault_type))
        .with_admin();

    read.merge(admin)
}

#[derive(Debug, Deserialize)]
pub struct FaultTypeRequest {
    pub name: String,
}

/// Fault type catalog, visible to everyone with a token
pub async fn list_fault_types(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<fault_type::Model>>>, ServiceError> {
    let types = fault_type::Entity::find()
        .order_by_desc(fault_type::Column::CreatedAt)
        .all(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

    Ok(Json(ApiResponse::success(types)))
}

/// Add a fault type (admin only)
pub async fn create_fault_type(
    State(state): State<AppState>,
    Json(request): Json<FaultTypeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<fault_type::Model>>), ServiceError> {
    if request.name.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "Name is required".to_string(),
        ));
    }

    let created = fault_type::ActiveModel {
        name: Set(request.name),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await
    .map_err(ServiceError::DatabaseError)?;

    info!(fault_type_id = created.id, "Fault type created");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Rename a fault type (admin only)
pub async fn update_fault_type(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<FaultTypeRequest>,
) -> Result<Json<ApiResponse<fault_type::Model>>, ServiceError> {
    let existing = fault_type::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?
        .ok_or_else(|| ServiceError::NotFound(format!("Fault type with id {} not found", id)))?;

    let mut active: fault_type::ActiveModel = existing.into();
    active.name = Set(request.name);

    let updated = active
        .update(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

    Ok(Json(ApiResponse::success(updated)))
}

/// Remove a fault type (admin only)
pub async fn delete_fault_type(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    let result = fault_type::Entity::delete_by_id(id)
        .exec(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

    if result.rows_affected == 0 {
        return Err(ServiceError::NotFound(format!(
            "Fault type with id {} not found",
            id
        )));
    }

    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": true }),
    )))
}
