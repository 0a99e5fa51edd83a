use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, LoaderTrait, QueryOrder, QuerySelect, Set};
use serde::Serialize;
use tracing::instrument;

use crate::{
    db::DbPool,
    entities::{action_log, general_fault, user},
    errors::ServiceError,
};

/// Most recent rows returned by the listing endpoint.
const RECENT_LOG_LIMIT: u64 = 100;

#[derive(Debug, Serialize)]
pub struct LogUserRef {
    pub id: i32,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LogFaultRef {
    pub id: i32,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct ActionLogView {
    #[serde(flatten)]
    pub log: action_log::Model,
    pub user: Option<LogUserRef>,
    pub general_fault: Option<LogFaultRef>,
}

/// Audit trail writer/reader. Every auth action and admin mutation of
/// interest appends one row; reads are capped to the recent window the panel
/// shows.
#[derive(Clone)]
pub struct ActionLogService {
    db: Arc<DbPool>,
}

impl ActionLogService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Appends an audit row.
    #[instrument(skip(self, description))]
    pub async fn log(
        &self,
        user_id: i32,
        action: &str,
        description: impl Into<String>,
        general_fault_id: Option<i32>,
    ) -> Result<action_log::Model, ServiceError> {
        let entry = action_log::ActiveModel {
            user_id: Set(user_id),
            action: Set(action.to_string()),
            description: Set(Some(description.into())),
            general_fault_id: Set(general_fault_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        entry
            .insert(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Most recent audit rows with their user and linked fault.
    #[instrument(skip(self))]
    pub async fn recent(&self) -> Result<Vec<ActionLogView>, ServiceError> {
        let db = self.db.as_ref();

        let logs = action_log::Entity::find()
            .order_by_desc(action_log::Column::CreatedAt)
            .limit(RECENT_LOG_LIMIT)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let users = logs
            .load_one(user::Entity, db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let faults = logs
            .load_one(general_fault::Entity, db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(logs
            .into_iter()
            .zip(users)
            .zip(faults)
            .map(|((log, user), fault)| ActionLogView {
                log,
                user: user.map(|u| LogUserRef {
                    id: u.id,
                    email: u.email,
                }),
                general_fault: fault.map(|f| LogFaultRef {
                    id: f.id,
                    description: f.description,
                }),
            })
            .collect())
    }
}
