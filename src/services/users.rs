use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    auth::{AuthService, ROLE_USER},
    db::DbPool,
    entities::user,
    errors::ServiceError,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminUpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
}

/// Public projection of a user row; what list/profile endpoints return.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i32,
    pub email: String,
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<user::Model> for UserView {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            role: model.role,
            first_name: model.first_name,
            last_name: model.last_name,
            phone: model.phone,
            department: model.department,
            created_at: model.created_at,
        }
    }
}

/// User management: own profile plus the admin surface.
#[derive(Clone)]
pub struct UserService {
    db: Arc<DbPool>,
    auth: Arc<AuthService>,
}

impl UserService {
    pub fn new(db: Arc<DbPool>, auth: Arc<AuthService>) -> Self {
        Self { db, auth }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: i32) -> Result<UserView, ServiceError> {
        let user = user::Entity::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("User with id {} not found", user_id)))?;

        Ok(user.into())
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<UserView>, ServiceError> {
        let users = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(users.into_iter().map(UserView::from).collect())
    }

    /// Creates a user. The password is always stored as an argon2 hash.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserView, ServiceError> {
        request.validate()?;

        let existing = user::Entity::find()
            .filter(user::Column::Email.eq(request.email.clone()))
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Email {} is already registered",
                request.email
            )));
        }

        let password_hash = self
            .auth
            .hash_password(&request.password)
            .map_err(|e| ServiceError::HashError(e.to_string()))?;

        let model = user::ActiveModel {
            email: Set(request.email),
            password_hash: Set(password_hash),
            role: Set(request.role.unwrap_or_else(|| ROLE_USER.to_string())),
            first_name: Set(request.first_name),
            last_name: Set(request.last_name),
            phone: Set(request.phone),
            department: Set(request.department),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let created = model
            .insert(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(user_id = created.id, "User created");
        Ok(created.into())
    }

    /// Profile self-service: only the contact fields, never role or email.
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: i32,
        request: UpdateProfileRequest,
    ) -> Result<UserView, ServiceError> {
        let user = user::Entity::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("User with id {} not found", user_id)))?;

        let mut active: user::ActiveModel = user.into();
        if let Some(v) = request.first_name {
            active.first_name = Set(Some(v));
        }
        if let Some(v) = request.last_name {
            active.last_name = Set(Some(v));
        }
        if let Some(v) = request.phone {
            active.phone = Set(Some(v));
        }
        if let Some(v) = request.department {
            active.department = Set(Some(v));
        }

        let updated = active
            .update(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(updated.into())
    }

    /// Admin update: profile fields plus the role.
    #[instrument(skip(self, request))]
    pub async fn admin_update(
        &self,
        user_id: i32,
        request: AdminUpdateUserRequest,
    ) -> Result<UserView, ServiceError> {
        let user = user::Entity::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("User with id {} not found", user_id)))?;

        let mut active: user::ActiveModel = user.into();
        if let Some(v) = request.first_name {
            active.first_name = Set(Some(v));
        }
        if let Some(v) = request.last_name {
            active.last_name = Set(Some(v));
        }
        if let Some(v) = request.phone {
            active.phone = Set(Some(v));
        }
        if let Some(v) = request.department {
            active.department = Set(Some(v));
        }
        if let Some(v) = request.role {
            active.role = Set(v);
        }

        let updated = active
            .update(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(updated.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: i32) -> Result<(), ServiceError> {
        let user = user::Entity::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("User with id {} not found", user_id)))?;

        user.delete(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(user_id, "User deleted");
        Ok(())
    }

    /// Changes a password after verifying the old one.
    #[instrument(skip(self, old_password, new_password))]
    pub async fn change_password(
        &self,
        user_id: i32,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ServiceError> {
        if new_password.len() < 8 {
            return Err(ServiceError::ValidationError(
                "New password must be at least 8 characters".to_string(),
            ));
        }

        let user = user::Entity::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("User with id {} not found", user_id)))?;

        let matches = self
            .auth
            .verify_password(&user.password_hash, old_password)
            .map_err(|e| ServiceError::HashError(e.to_string()))?;
        if !matches {
            return Err(ServiceError::Unauthorized(
                "Old password is incorrect".to_string(),
            ));
        }

        let password_hash = self
            .auth
            .hash_password(new_password)
            .map_err(|e| ServiceError::HashError(e.to_string()))?;

        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(password_hash);
        active
            .update(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(())
    }
}
