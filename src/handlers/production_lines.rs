use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::info;

use crate::{
    auth::AuthRouterExt, entities::production_line, errors::ServiceError, ApiResponse, AppState,
};

pub fn routes() -> Router<AppState> {
    let read = Router::new().route("/", get(list_lines)).with_auth();

    let admin = Router::new()
        .route("/", post(create_line))
        .route("/:id", delete(delete_line))
        .with_admin();

    read.merge(admin)
}

#[derive(Debug, Deserialize)]
pub struct CreateLineRequest {
    pub code: String,
    pub name: String,
}

pub async fn list_lines(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<production_line::Model>>>, ServiceError> {
    let lines = production_line::Entity::find()
        .order_by_asc(production_line::Column::Code)
        .all(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

    Ok(Json(ApiResponse::success(lines)))
}

pub async fn create_line(
    State(state): State<AppState>,
    Json(request): Json<CreateLineRequest>,
) -> Result<(StatusCode, Json<ApiResponse<production_line::Model>>), ServiceError> {
    if request.code.trim().is_empty() || request.name.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "Code and name are required".to_string(),
        ));
    }

    let duplicate = production_line::Entity::find()
        .filter(production_line::Column::Code.eq(request.code.clone()))
        .one(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;
    if duplicate.is_some() {
        return Err(ServiceError::Conflict(format!(
            "Line code {} already exists",
            request.code
        )));
    }

    let created = production_line::ActiveModel {
        code: Set(request.code),
        name: Set(request.name),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await
    .map_err(ServiceError::DatabaseError)?;

    info!(line_id = created.id, "Production line created: {}", created.code);
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

pub async fn delete_line(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    let result = production_line::Entity::delete_by_id(id)
        .exec(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

    if result.rows_affected == 0 {
        return Err(ServiceError::NotFound(format!(
            "Production line with id {} not found",
            id
        )));
    }

    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": true }),
    )))
}
