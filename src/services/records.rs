use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, LoaderTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{fault_record, fault_type, motor, user},
    errors::ServiceError,
    events::{Event, EventSender},
};

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateRecordRequest {
    pub motor_id: i32,
    pub fault_type_id: i32,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub duration_min: Option<i32>,
    pub occurred_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRecordRequest {
    pub motor_id: Option<i32>,
    pub fault_type_id: Option<i32>,
    pub description: Option<String>,
    pub duration_min: Option<i32>,
    pub occurred_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct RecordUserRef {
    pub id: i32,
    pub email: String,
    pub role: String,
}

/// Fault record with the relations the records table renders.
#[derive(Debug, Serialize)]
pub struct FaultRecordView {
    #[serde(flatten)]
    pub record: fault_record::Model,
    pub user: Option<RecordUserRef>,
    pub motor: Option<motor::Model>,
    pub fault_type: Option<fault_type::Model>,
}

/// Motor fault records. Creation also watches for the same motor + fault-type
/// pair recurring; hitting the configured count emits a recurrence alert.
#[derive(Clone)]
pub struct RecordService {
    db: Arc<DbPool>,
    event_sender: Option<EventSender>,
    recurrence_alert_count: u64,
}

impl RecordService {
    pub fn new(
        db: Arc<DbPool>,
        event_sender: Option<EventSender>,
        recurrence_alert_count: u64,
    ) -> Self {
        Self {
            db,
            event_sender,
            recurrence_alert_count,
        }
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!("Failed to send record event: {}", e);
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, motor_id: Option<i32>) -> Result<Vec<FaultRecordView>, ServiceError> {
        let mut query = fault_record::Entity::find();
        if let Some(motor_id) = motor_id {
            query = query.filter(fault_record::Column::MotorId.eq(motor_id));
        }

        let records = query
            .order_by_desc(fault_record::Column::OccurredAt)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.attach_relations(records).await
    }

    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<FaultRecordView>, ServiceError> {
        let records = fault_record::Entity::find()
            .filter(fault_record::Column::UserId.eq(user_id))
            .order_by_desc(fault_record::Column::OccurredAt)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.attach_relations(records).await
    }

    /// Creates a record, then counts how often this motor has logged this
    /// fault type. Exactly hitting the alert count emits a recurrence event;
    /// later repetitions stay quiet so the inbox is not flooded.
    #[instrument(skip(self, request), fields(motor_id = request.motor_id, fault_type_id = request.fault_type_id))]
    pub async fn create(
        &self,
        user_id: i32,
        request: CreateRecordRequest,
    ) -> Result<FaultRecordView, ServiceError> {
        request.validate()?;

        let db = self.db.as_ref();

        let motor = motor::Entity::find_by_id(request.motor_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "Motor {} does not exist",
                    request.motor_id
                ))
            })?;

        let fault_type = fault_type::Entity::find_by_id(request.fault_type_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "Fault type {} does not exist",
                    request.fault_type_id
                ))
            })?;

        let record = fault_record::ActiveModel {
            user_id: Set(user_id),
            motor_id: Set(request.motor_id),
            fault_type_id: Set(request.fault_type_id),
            description: Set(request.description),
            duration_min: Set(request.duration_min),
            occurred_at: Set(request.occurred_at.unwrap_or_else(Utc::now)),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(ServiceError::DatabaseError)?;

        info!(record_id = record.id, "Fault record created");
        self.emit(Event::FaultRecorded {
            record_id: record.id,
            motor_id: record.motor_id,
            fault_type_id: record.fault_type_id,
        })
        .await;

        let occurrences = fault_record::Entity::find()
            .filter(fault_record::Column::MotorId.eq(request.motor_id))
            .filter(fault_record::Column::FaultTypeId.eq(request.fault_type_id))
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if occurrences == self.recurrence_alert_count {
            self.emit(Event::FaultRecurrence {
                motor_id: motor.id,
                motor_name: motor.name.clone(),
                fault_type: fault_type.name.clone(),
                occurrences,
            })
            .await;
        }

        let mut views = self.attach_relations(vec![record]).await?;
        Ok(views.remove(0))
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        record_id: i32,
        request: UpdateRecordRequest,
    ) -> Result<FaultRecordView, ServiceError> {
        let record = fault_record::Entity::find_by_id(record_id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Fault record with id {} not found", record_id))
            })?;

        let mut active: fault_record::ActiveModel = record.into();
        if let Some(v) = request.motor_id {
            active.motor_id = Set(v);
        }
        if let Some(v) = request.fault_type_id {
            active.fault_type_id = Set(v);
        }
        if let Some(v) = request.description {
            active.description = Set(v);
        }
        if let Some(v) = request.duration_min {
            active.duration_min = Set(Some(v));
        }
        if let Some(v) = request.occurred_at {
            active.occurred_at = Set(v);
        }

        let updated = active
            .update(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut views = self.attach_relations(vec![updated]).await?;
        Ok(views.remove(0))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, record_id: i32) -> Result<(), ServiceError> {
        let result = fault_record::Entity::delete_by_id(record_id)
            .exec(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Fault record with id {} not found",
                record_id
            )));
        }

        info!(record_id, "Fault record deleted");
        Ok(())
    }

    async fn attach_relations(
        &self,
        records: Vec<fault_record::Model>,
    ) -> Result<Vec<FaultRecordView>, ServiceError> {
        let db = self.db.as_ref();

        let users = records
            .load_one(user::Entity, db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let motors = records
            .load_one(motor::Entity, db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let fault_types = records
            .load_one(fault_type::Entity, db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(records
            .into_iter()
            .zip(users)
            .zip(motors)
            .zip(fault_types)
            .map(|(((record, user), motor), fault_type)| FaultRecordView {
                record,
                user: user.map(|u| RecordUserRef {
                    id: u.id,
                    email: u.email,
                    role: u.role,
                }),
                motor,
                fault_type,
            })
            .collect())
    }
}
