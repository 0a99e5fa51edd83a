use axum::{extract::State, response::Json, routing::get, Router};

use crate::{
    auth::AuthRouterExt,
    errors::ServiceError,
    services::analytics::{DashboardMetrics, FleetMetrics, MotorHealth},
    ApiResponse, AppState,
};

/// Build the analytics Router scoped under `/api/analytics`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard_metrics))
        .route("/fleet", get(get_fleet_metrics))
        .route("/motors", get(get_motor_health))
        .with_auth()
}

/// Full dashboard payload: fleet counts plus per-motor MTBF/health
#[utoipa::path(
    get,
    path = "/api/analytics/dashboard",
    responses(
        (status = 200, description = "Dashboard metrics retrieved successfully", body = ApiResponse<DashboardMetrics>)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn get_dashboard_metrics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardMetrics>>, ServiceError> {
    let metrics = state.services.analytics.get_dashboard_metrics().await?;
    Ok(Json(ApiResponse::success(metrics)))
}

/// Fleet-level counts only
pub async fn get_fleet_metrics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FleetMetrics>>, ServiceError> {
    let metrics = state.services.analytics.get_fleet_metrics().await?;
    Ok(Json(ApiResponse::success(metrics)))
}

/// Per-motor reliability summaries only
pub async fn get_motor_health(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MotorHealth>>>, ServiceError> {
    let metrics = state.services.analytics.get_motor_health().await?;
    Ok(Json(ApiResponse::success(metrics)))
}
