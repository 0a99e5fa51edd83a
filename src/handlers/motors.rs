use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

use crate::{
    auth::AuthRouterExt, entities::motor, errors::ServiceError, events::Event, ApiResponse,
    AppState,
};

pub fn routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_motors))
        .route("/:id", get(get_motor))
        .with_auth();

    let admin = Router::new()
        .route("/", post(create_motor))
        .route("/:id", put(update_motor))
        .route("/:id", delete(delete_motor))
        .with_admin();

    read.merge(admin)
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateMotorRequest {
    #[validate(length(min = 1, message = "Serial is required"))]
    pub serial: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub power_kw: Option<f64>,
    pub voltage: Option<f64>,
    pub current: Option<f64>,
    pub phase: Option<i32>,
    pub manufacturer: Option<String>,
    pub model_no: Option<String>,
    pub year: Option<i32>,
    pub rpm: Option<i32>,
    pub protection: Option<String>,
    pub connection_type: Option<String>,
    pub last_service: Option<DateTime<Utc>>,
    pub next_service: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub qr_code: Option<String>,
    pub image_url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMotorRequest {
    pub serial: Option<String>,
    pub name: Option<String>,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub power_kw: Option<f64>,
    pub voltage: Option<f64>,
    pub current: Option<f64>,
    pub phase: Option<i32>,
    pub manufacturer: Option<String>,
    pub model_no: Option<String>,
    pub year: Option<i32>,
    pub rpm: Option<i32>,
    pub protection: Option<String>,
    pub connection_type: Option<String>,
    pub last_service: Option<DateTime<Utc>>,
    pub next_service: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub qr_code: Option<String>,
    pub image_url: Option<String>,
    pub notes: Option<String>,
}

/// List all motors, newest first
#[utoipa::path(
    get,
    path = "/api/motors",
    responses(
        (status = 200, description = "Motors retrieved successfully"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Motors"
)]
pub async fn list_motors(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<motor::Model>>>, ServiceError> {
    let motors = motor::Entity::find()
        .order_by_desc(motor::Column::CreatedAt)
        .all(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

    Ok(Json(ApiResponse::success(motors)))
}

/// Get a single motor
#[utoipa::path(
    get,
    path = "/api/motors/{id}",
    params(("id" = i32, Path, description = "Motor id")),
    responses(
        (status = 200, description = "Motor retrieved successfully"),
        (status = 404, description = "Motor not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Motors"
)]
pub async fn get_motor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<motor::Model>>, ServiceError> {
    let motor = motor::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?
        .ok_or_else(|| ServiceError::NotFound(format!("Motor with id {} not found", id)))?;

    Ok(Json(ApiResponse::success(motor)))
}

/// Register a new motor (admin only)
#[utoipa::path(
    post,
    path = "/api/motors",
    responses(
        (status = 201, description = "Motor created successfully"),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Motors"
)]
pub async fn create_motor(
    State(state): State<AppState>,
    Json(request): Json<CreateMotorRequest>,
) -> Result<(StatusCode, Json<ApiResponse<motor::Model>>), ServiceError> {
    request.validate()?;

    let model = motor::ActiveModel {
        serial: Set(request.serial),
        name: Set(request.name),
        tag: Set(request.tag),
        description: Set(request.description),
        status: Set(request.status),
        location: Set(request.location),
        power_kw: Set(request.power_kw),
        voltage: Set(request.voltage),
        current: Set(request.current),
        phase: Set(request.phase),
        manufacturer: Set(request.manufacturer),
        model_no: Set(request.model_no),
        year: Set(request.year),
        rpm: Set(request.rpm),
        protection: Set(request.protection),
        connection_type: Set(request.connection_type),
        last_service: Set(request.last_service),
        next_service: Set(request.next_service),
        is_active: Set(request.is_active.unwrap_or(true)),
        qr_code: Set(request.qr_code),
        image_url: Set(request.image_url),
        notes: Set(request.notes),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = model
        .insert(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

    info!(motor_id = created.id, "Motor created: {}", created.serial);
    if let Err(e) = state.event_sender.send(Event::MotorCreated(created.id)).await {
        warn!("Failed to send motor created event: {}", e);
    }

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Update a motor (admin only)
pub async fn update_motor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateMotorRequest>,
) -> Result<Json<ApiResponse<motor::Model>>, ServiceError> {
    let existing = motor::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?
        .ok_or_else(|| ServiceError::NotFound(format!("Motor with id {} not found", id)))?;

    let mut active: motor::ActiveModel = existing.into();
    if let Some(v) = request.serial {
        active.serial = Set(v);
    }
    if let Some(v) = request.name {
        active.name = Set(v);
    }
    if let Some(v) = request.tag {
        active.tag = Set(Some(v));
    }
    if let Some(v) = request.description {
        active.description = Set(Some(v));
    }
    if let Some(v) = request.status {
        active.status = Set(Some(v));
    }
    if let Some(v) = request.location {
        active.location = Set(Some(v));
    }
    if let Some(v) = request.power_kw {
        active.power_kw = Set(Some(v));
    }
    if let Some(v) = request.voltage {
        active.voltage = Set(Some(v));
    }
    if let Some(v) = request.current {
        active.current = Set(Some(v));
    }
    if let Some(v) = request.phase {
        active.phase = Set(Some(v));
    }
    if let Some(v) = request.manufacturer {
        active.manufacturer = Set(Some(v));
    }
    if let Some(v) = request.model_no {
        active.model_no = Set(Some(v));
    }
    if let Some(v) = request.year {
        active.year = Set(Some(v));
    }
    if let Some(v) = request.rpm {
        active.rpm = Set(Some(v));
    }
    if let Some(v) = request.protection {
        active.protection = Set(Some(v));
    }
    if let Some(v) = request.connection_type {
        active.connection_type = Set(Some(v));
    }
    if let Some(v) = request.last_service {
        active.last_service = Set(Some(v));
    }
    if let Some(v) = request.next_service {
        active.next_service = Set(Some(v));
    }
    if let Some(v) = request.is_active {
        active.is_active = Set(v);
    }
    if let Some(v) = request.qr_code {
        active.qr_code = Set(Some(v));
    }
    if let Some(v) = request.image_url {
        active.image_url = Set(Some(v));
    }
    if let Some(v) = request.notes {
        active.notes = Set(Some(v));
    }

    let updated = active
        .update(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

    if let Err(e) = state.event_sender.send(Event::MotorUpdated(updated.id)).await {
        warn!("Failed to send motor updated event: {}", e);
    }

    Ok(Json(ApiResponse::success(updated)))
}

/// Delete a motor (admin only)
pub async fn delete_motor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    let result = motor::Entity::delete_by_id(id)
        .exec(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

    if result.rows_affected == 0 {
        return Err(ServiceError::NotFound(format!(
            "Motor with id {} not found",
            id
        )));
    }

    info!(motor_id = id, "Motor deleted");
    if let Err(e) = state.event_sender.send(Event::MotorDeleted(id)).await {
        warn!("Failed to send motor deleted event: {}", e);
    }

    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": true }),
    )))
}
