use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    auth::{AuthRouterExt, AuthUser, ROLE_USER},
    errors::ServiceError,
    events::Event,
    services::users::{CreateUserRequest, UserView},
    AppState,
};

pub fn routes() -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login));

    let authenticated = Router::new()
        .route("/change-password", post(change_password))
        .with_auth();

    public.merge(authenticated)
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: i32,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Register a new panel account. Self-registration defaults to the plain
/// user role; only an existing admin can later promote it.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserView>), ServiceError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ServiceError::ValidationError(
            "Email and password are required".to_string(),
        ));
    }

    let created = state
        .services
        .users
        .create(CreateUserRequest {
            email: request.email,
            password: request.password,
            role: Some(request.role.unwrap_or_else(|| ROLE_USER.to_string())),
            first_name: None,
            last_name: None,
            phone: None,
            department: None,
        })
        .await?;

    state
        .services
        .action_logs
        .log(created.id, "register", "New user account registered", None)
        .await?;

    if let Err(e) = state.event_sender.send(Event::UserRegistered(created.id)).await {
        warn!("Failed to send registration event: {}", e);
    }

    Ok((StatusCode::CREATED, Json(created)))
}

/// Log in with email + password. The failure message never says which of the
/// two was wrong.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ServiceError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ServiceError::ValidationError(
            "Email and password are required".to_string(),
        ));
    }

    let auth = &state.services.auth;

    let user = auth
        .find_user_by_email(&request.email)
        .await
        .map_err(|e| ServiceError::InternalError(e.to_string()))?
        .ok_or_else(|| ServiceError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = auth
        .verify_password(&user.password_hash, &request.password)
        .map_err(|e| ServiceError::HashError(e.to_string()))?;
    if !valid {
        return Err(ServiceError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = auth
        .generate_token(&user)
        .map_err(|e| ServiceError::InternalError(e.to_string()))?;

    state
        .services
        .action_logs
        .log(user.id, "login", "User logged in", None)
        .await?;

    if let Err(e) = state.event_sender.send(Event::UserLoggedIn(user.id)).await {
        warn!("Failed to send login event: {}", e);
    }

    info!(user_id = user.id, "Login successful");
    Ok(Json(LoginResponse {
        token,
        user: LoginUser {
            id: user.id,
            email: user.email,
            role: user.role,
        },
    }))
}

/// Change the caller's password after verifying the old one.
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    if request.old_password.is_empty() || request.new_password.is_empty() {
        return Err(ServiceError::ValidationError(
            "Old and new password are required".to_string(),
        ));
    }

    state
        .services
        .users
        .change_password(
            auth_user.user_id,
            &request.old_password,
            &request.new_password,
        )
        .await?;

    state
        .services
        .action_logs
        .log(
            auth_user.user_id,
            "change_password",
            "User changed their password",
            None,
        )
        .await?;

    if let Err(e) = state
        .event_sender
        .send(Event::PasswordChanged(auth_user.user_id))
        .await
    {
        warn!("Failed to send password change event: {}", e);
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Password changed successfully"
    })))
}
