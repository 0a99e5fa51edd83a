use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::{
    auth::AuthRouterExt,
    entities::{control_device, motor},
    errors::ServiceError,
    events::Event,
    ApiResponse, AppState,
};

pub fn routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_devices))
        .route("/:id", get(get_device))
        .with_auth();

    let admin = Router::new()
        .route("/", post(create_device))
        .route("/:id", put(update_device))
        .route("/:id", delete(delete_device))
        .with_admin();

    read.merge(admin)
}

/// Device plus the motor it currently drives, if any.
#[derive(Debug, Serialize)]
pub struct ControlDeviceView {
    #[serde(flatten)]
    pub device: control_device::Model,
    pub motor: Option<motor::Model>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateControlDeviceRequest {
    #[validate(length(min = 1, message = "Device type is required"))]
    pub device_type: String,
    #[validate(length(min = 1, message = "Serial is required"))]
    pub serial: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub power_kw: f64,
    pub voltage: f64,
    pub status: Option<String>,
    #[serde(default)]
    pub is_spare: bool,
    pub active_motor_id: Option<i32>,
    pub spare_for_motors: Option<String>,
    pub location: Option<String>,
    pub protection: Option<String>,
    pub comm_protocol: Option<String>,
    pub control_type: Option<String>,
    pub firmware: Option<String>,
    pub ramp_up_time: Option<i32>,
    pub ramp_down_time: Option<i32>,
    pub bypass_contact: Option<String>,
    pub year: Option<i32>,
    pub last_service: Option<DateTime<Utc>>,
    pub next_service: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub qr_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateControlDeviceRequest {
    pub device_type: Option<String>,
    pub serial: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub power_kw: Option<f64>,
    pub voltage: Option<f64>,
    pub status: Option<String>,
    pub is_spare: Option<bool>,
    pub active_motor_id: Option<i32>,
    pub spare_for_motors: Option<String>,
    pub location: Option<String>,
    pub protection: Option<String>,
    pub comm_protocol: Option<String>,
    pub control_type: Option<String>,
    pub firmware: Option<String>,
    pub ramp_up_time: Option<i32>,
    pub ramp_down_time: Option<i32>,
    pub bypass_contact: Option<String>,
    pub year: Option<i32>,
    pub last_service: Option<DateTime<Utc>>,
    pub next_service: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub qr_code: Option<String>,
}

/// List all control devices with their driven motors
pub async fn list_devices(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ControlDeviceView>>>, ServiceError> {
    let rows = control_device::Entity::find()
        .find_also_related(motor::Entity)
        .all(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

    let views = rows
        .into_iter()
        .map(|(device, motor)| ControlDeviceView { device, motor })
        .collect();

    Ok(Json(ApiResponse::success(views)))
}

/// Get a single control device
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ControlDeviceView>>, ServiceError> {
    let row = control_device::Entity::find_by_id(id)
        .find_also_related(motor::Entity)
        .one(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("Control device with id {} not found", id))
        })?;

    Ok(Json(ApiResponse::success(ControlDeviceView {
        device: row.0,
        motor: row.1,
    })))
}

/// Register a new control device (admin only)
pub async fn create_device(
    State(state): State<AppState>,
    Json(request): Json<CreateControlDeviceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<control_device::Model>>), ServiceError> {
    request.validate()?;

    if let Some(motor_id) = request.active_motor_id {
        let exists = motor::Entity::find_by_id(motor_id)
            .one(state.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;
        if exists.is_none() {
            return Err(ServiceError::ValidationError(format!(
                "Motor {} does not exist",
                motor_id
            )));
        }
    }

    let model = control_device::ActiveModel {
        device_type: Set(request.device_type),
        serial: Set(request.serial),
        brand: Set(request.brand),
        model: Set(request.model),
        power_kw: Set(request.power_kw),
        voltage: Set(request.voltage),
        status: Set(request.status),
        is_spare: Set(request.is_spare),
        active_motor_id: Set(request.active_motor_id),
        spare_for_motors: Set(request.spare_for_motors),
        location: Set(request.location),
        protection: Set(request.protection),
        comm_protocol: Set(request.comm_protocol),
        control_type: Set(request.control_type),
        firmware: Set(request.firmware),
        ramp_up_time: Set(request.ramp_up_time),
        ramp_down_time: Set(request.ramp_down_time),
        bypass_contact: Set(request.bypass_contact),
        year: Set(request.year),
        last_service: Set(request.last_service),
        next_service: Set(request.next_service),
        notes: Set(request.notes),
        image_url: Set(request.image_url),
        qr_code: Set(request.qr_code),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = model
        .insert(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

    info!(device_id = created.id, "Control device created");
    if let Err(e) = state
        .event_sender
        .send(Event::ControlDeviceCreated(created.id))
        .await
    {
        warn!("Failed to send control device event: {}", e);
    }

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Update a control device (admin only)
pub async fn update_device(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateControlDeviceRequest>,
) -> Result<Json<ApiResponse<control_device::Model>>, ServiceError> {
    let existing = control_device::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("Control device with id {} not found", id))
        })?;

    let mut active: control_device::ActiveModel = existing.into();
    if let Some(v) = request.device_type {
        active.device_type = Set(v);
    }
    if let Some(v) = request.serial {
        active.serial = Set(v);
    }
    if let Some(v) = request.brand {
        active.brand = Set(Some(v));
    }
    if let Some(v) = request.model {
        active.model = Set(Some(v));
    }
    if let Some(v) = request.power_kw {
        active.power_kw = Set(v);
    }
    if let Some(v) = request.voltage {
        active.voltage = Set(v);
    }
    if let Some(v) = request.status {
        active.status = Set(Some(v));
    }
    if let Some(v) = request.is_spare {
        active.is_spare = Set(v);
    }
    if let Some(v) = request.active_motor_id {
        active.active_motor_id = Set(Some(v));
    }
    if let Some(v) = request.spare_for_motors {
        active.spare_for_motors = Set(Some(v));
    }
    if let Some(v) = request.location {
        active.location = Set(Some(v));
    }
    if let Some(v) = request.protection {
        active.protection = Set(Some(v));
    }
    if let Some(v) = request.comm_protocol {
        active.comm_protocol = Set(Some(v));
    }
    if let Some(v) = request.control_type {
        active.control_type = Set(Some(v));
    }
    if let Some(v) = request.firmware {
        active.firmware = Set(Some(v));
    }
    if let Some(v) = request.ramp_up_time {
        active.ramp_up_time = Set(Some(v));
    }
    if let Some(v) = request.ramp_down_time {
        active.ramp_down_time = Set(Some(v));
    }
    if let Some(v) = request.bypass_contact {
        active.bypass_contact = Set(Some(v));
    }
    if let Some(v) = request.year {
        active.year = Set(Some(v));
    }
    if let Some(v) = request.last_service {
        active.last_service = Set(Some(v));
    }
    if let Some(v) = request.next_service {
        active.next_service = Set(Some(v));
    }
    if let Some(v) = request.notes {
        active.notes = Set(Some(v));
    }
    if let Some(v) = request.image_url {
        active.image_url = Set(Some(v));
    }
    if let Some(v) = request.qr_code {
        active.qr_code = Set(Some(v));
    }

    let updated = active
        .update(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

    if let Err(e) = state
        .event_sender
        .send(Event::ControlDeviceUpdated(updated.id))
        .await
    {
        warn!("Failed to send control device event: {}", e);
    }

    Ok(Json(ApiResponse::success(updated)))
}

/// Delete a control device (admin only)
pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    let result = control_device::Entity::delete_by_id(id)
        .exec(state.db.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

    if result.rows_affected == 0 {
        return Err(ServiceError::NotFound(format!(
            "Control device with id {} not found",
            id
        )));
    }

    info!(device_id = id, "Control device deleted");
    if let Err(e) = state
        .event_sender
        .send(Event::ControlDeviceDeleted(id))
        .await
    {
        warn!("Failed to send control device event: {}", e);
    }

    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": true }),
    )))
}
