use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};

use crate::{
    auth::{AuthRouterExt, AuthUser},
    errors::ServiceError,
    services::users::{
        AdminUpdateUserRequest, CreateUserRequest, UpdateProfileRequest, UserView,
    },
    ApiResponse, AppState,
};

pub fn routes() -> Router<AppState> {
    let own_profile = Router::new()
        .route("/me", get(get_me))
        .route("/me", put(update_me))
        .with_auth();

    let admin = Router::new()
        .route("/", get(list_users))
        .route("/", post(create_user))
        .route("/:id", put(update_user))
        .route("/:id", delete(delete_user))
        .with_admin();

    own_profile.merge(admin)
}

/// The caller's own profile
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<UserView>>, ServiceError> {
    let user = state.services.users.get(auth_user.user_id).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// Update the caller's contact fields
pub async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserView>>, ServiceError> {
    let user = state
        .services
        .users
        .update_profile(auth_user.user_id, request)
        .await?;
    Ok(Json(ApiResponse::success(user)))
}

/// List all users (admin only)
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserView>>>, ServiceError> {
    let users = state.services.users.list().await?;
    Ok(Json(ApiResponse::success(users)))
}

/// Create a user (admin only); 409 on duplicate email
pub async fn create_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserView>>), ServiceError> {
    let created = state.services.users.create(request).await?;

    state
        .services
        .action_logs
        .log(
            auth_user.user_id,
            "create_user",
            format!("Created user account {}", created.email),
            None,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Update any user including role (admin only)
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<AdminUpdateUserRequest>,
) -> Result<Json<ApiResponse<UserView>>, ServiceError> {
    let user = state.services.users.admin_update(id, request).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// Delete a user (admin only)
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    state.services.users.delete(id).await?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": true }),
    )))
}
