use axum::{extract::State, response::Json, routing::get, Router};

use crate::{
    auth::AuthRouterExt, errors::ServiceError, services::action_logs::ActionLogView, ApiResponse,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_logs)).with_auth()
}

/// Most recent audit rows with user and fault references
pub async fn list_logs(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ActionLogView>>>, ServiceError> {
    let logs = state.services.action_logs.recent().await?;
    Ok(Json(ApiResponse::success(logs)))
}
