use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    auth::{AuthRouterExt, AuthUser},
    entities::announcement,
    errors::ServiceError,
    events::Event,
    ApiResponse, AppState,
};

pub fn routes() -> Router<AppState> {
    let read = Router::new().route("/", get(list_announcements)).with_auth();

    let admin = Router::new()
        .route("/", post(create_announcement))
        .route("/:id", delete(delete_announcement))
        .with_admin();

    read.merge(admin)
}

#[derive(Debug, Deserialize)]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub body: String,
}

pub async fn list_announcements(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<announcement::Model>>>, ServiceError> {
    let announcements = announcement::Entity::find()
        .order_by_desc(announcement::Column::PostedAt)
        .all(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

    Ok(Json(ApiResponse::success(announcements)))
}

pub async fn create_announcement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<ApiResponse<announcement::Model>>), ServiceError> {
    if request.title.trim().is_empty() || request.body.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "Title and body are required".to_string(),
        ));
    }

    let created = announcement::ActiveModel {
        title: Set(request.title),
        body: Set(request.body),
        posted_at: Set(Utc::now()),
        created_by: Set(auth_user.user_id),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await
    .map_err(ServiceError::DatabaseError)?;

    info!(announcement_id = created.id, "Announcement posted");
    if let Err(e) = state
        .event_sender
        .send(Event::AnnouncementPosted(created.id))
        .await
    {
        warn!("Failed to send announcement event: {}", e);
    }

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

pub async fn delete_announcement(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    let result = announcement::Entity::delete_by_id(id)
        .exec(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

    if result.rows_affected == 0 {
        return Err(ServiceError::NotFound(format!(
            "Announcement with id {} not found",
            id
        )));
    }

    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": true }),
    )))
}
