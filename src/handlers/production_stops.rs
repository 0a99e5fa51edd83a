use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, LoaderTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    auth::{AuthRouterExt, AuthUser},
    entities::{general_fault, production_stop, user},
    errors::ServiceError,
    ApiResponse, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stops))
        .route("/", post(create_stop))
        .route("/:id", put(update_stop))
        .route("/:id", delete(delete_stop))
        .with_auth()
}

#[derive(Debug, Deserialize)]
pub struct StopRequest {
    pub line: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_min: i32,
    pub reason: Option<String>,
    pub general_fault_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct StopUserRef {
    pub id: i32,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ProductionStopView {
    #[serde(flatten)]
    pub stop: production_stop::Model,
    pub fault: Option<general_fault::Model>,
    pub created_by_user: Option<StopUserRef>,
}

pub async fn list_stops(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProductionStopView>>>, ServiceError> {
    let db = state.db.as_ref();

    let stops = production_stop::Entity::find()
        .order_by_desc(production_stop::Column::StartedAt)
        .all(db)
        .await
        .map_err(ServiceError::DatabaseError)?;

    let faults = stops
        .load_one(general_fault::Entity, db)
        .await
        .map_err(ServiceError::DatabaseError)?;
    let users = stops
        .load_one(user::Entity, db)
        .await
        .map_err(ServiceError::DatabaseError)?;

    let views = stops
        .into_iter()
        .zip(faults)
        .zip(users)
        .map(|((stop, fault), user)| ProductionStopView {
            stop,
            fault,
            created_by_user: user.map(|u| StopUserRef {
                id: u.id,
                email: u.email,
            }),
        })
        .collect();

    Ok(Json(ApiResponse::success(views)))
}

pub async fn create_stop(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<StopRequest>,
) -> Result<(StatusCode, Json<ApiResponse<production_stop::Model>>), ServiceError> {
    if request.ended_at < request.started_at {
        return Err(ServiceError::ValidationError(
            "End time cannot be before start time".to_string(),
        ));
    }

    let created = production_stop::ActiveModel {
        line: Set(request.line),
        started_at: Set(request.started_at),
        ended_at: Set(request.ended_at),
        duration_min: Set(request.duration_min),
        reason: Set(request.reason),
        general_fault_id: Set(request.general_fault_id),
        created_by: Set(Some(auth_user.user_id)),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await
    .map_err(ServiceError::DatabaseError)?;

    info!(stop_id = created.id, "Production stop recorded");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

pub async fn update_stop(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<StopRequest>,
) -> Result<Json<ApiResponse<production_stop::Model>>, ServiceError> {
    let existing = production_stop::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("Production stop with id {} not found", id))
        })?;

    if request.ended_at < request.started_at {
        return Err(ServiceError::ValidationError(
            "End time cannot be before start time".to_string(),
        ));
    }

    let mut active: production_stop::ActiveModel = existing.into();
    active.line = Set(request.line);
    active.started_at = Set(request.started_at);
    active.ended_at = Set(request.ended_at);
    active.duration_min = Set(request.duration_min);
    active.reason = Set(request.reason);
    active.general_fault_id = Set(request.general_fault_id);

    let updated = active
        .update(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

    Ok(Json(ApiResponse::success(updated)))
}

pub async fn delete_stop(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    let result = production_stop::Entity::delete_by_id(id)
        .exec(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

    if result.rows_affected == 0 {
        return Err(ServiceError::NotFound(format!(
            "Production stop with id {} not found",
            id
        )));
    }

    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": true }),
    )))
}
