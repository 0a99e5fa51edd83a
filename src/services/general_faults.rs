use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, LoaderTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        fault_file, general_fault, general_fault_line, production_line, stock, stock_usage, user,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

#[derive(Debug, Deserialize)]
pub struct GeneralFaultFilter {
    /// Restrict to faults that hit this production line
    pub line: Option<i32>,
    pub production_impact: Option<bool>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct FaultLineInput {
    pub line_id: i32,
    #[serde(default)]
    pub downtime_min: i32,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct FaultFileInput {
    pub url: String,
    pub file_name: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct FaultStockUsageInput {
    pub stock_id: i32,
    pub amount: i32,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateGeneralFaultRequest {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub location: Option<String>,
    #[serde(default)]
    pub production_impact: bool,
    pub occurred_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lines: Vec<FaultLineInput>,
    #[serde(default)]
    pub files: Vec<FaultFileInput>,
    #[serde(default)]
    pub stock_usages: Vec<FaultStockUsageInput>,
}

#[derive(Debug, Serialize)]
pub struct FaultReporterRef {
    pub id: i32,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct FaultLineView {
    pub id: i32,
    pub downtime_min: i32,
    pub line: production_line::Model,
}

#[derive(Debug, Serialize)]
pub struct GeneralFaultView {
    #[serde(flatten)]
    pub fault: general_fault::Model,
    pub reporter: Option<FaultReporterRef>,
    pub lines: Vec<FaultLineView>,
    pub files: Vec<fault_file::Model>,
}

/// Site-wide fault reporting. Creation is the one multi-statement workflow in
/// the system: the fault row, its line downtime associations, file
/// attachments and spare-part deductions all commit or roll back together.
#[derive(Clone)]
pub struct GeneralFaultService {
    db: Arc<DbPool>,
    event_sender: Option<EventSender>,
    downtime_alert_threshold_min: i32,
}

impl GeneralFaultService {
    pub fn new(
        db: Arc<DbPool>,
        event_sender: Option<EventSender>,
        downtime_alert_threshold_min: i32,
    ) -> Self {
        Self {
            db,
            event_sender,
            downtime_alert_threshold_min,
        }
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!("Failed to send general fault event: {}", e);
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: GeneralFaultFilter,
    ) -> Result<Vec<GeneralFaultView>, ServiceError> {
        let db = self.db.as_ref();

        let mut condition = Condition::all();
        if let Some(impact) = filter.production_impact {
            condition = condition.add(general_fault::Column::ProductionImpact.eq(impact));
        }
        if let (Some(start), Some(end)) = (filter.start, filter.end) {
            condition = condition
                .add(general_fault::Column::OccurredAt.gte(start))
                .add(general_fault::Column::OccurredAt.lte(end));
        }

        let mut faults = general_fault::Entity::find()
            .filter(condition)
            .order_by_desc(general_fault::Column::OccurredAt)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        // Line filter needs the join table; applied after the fetch since the
        // lists here are panel-sized
        if let Some(line_id) = filter.line {
            let fault_ids: Vec<i32> = general_fault_line::Entity::find()
                .filter(general_fault_line::Column::LineId.eq(line_id))
                .all(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .into_iter()
                .map(|l| l.general_fault_id)
                .collect();
            faults.retain(|f| fault_ids.contains(&f.id));
        }

        self.attach_relations(faults).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, fault_id: i32) -> Result<GeneralFaultView, ServiceError> {
        let fault = general_fault::Entity::find_by_id(fault_id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("General fault with id {} not found", fault_id))
            })?;

        let mut views = self.attach_relations(vec![fault]).await?;
        Ok(views.remove(0))
    }

    /// Creates a general fault with its line associations, files and stock
    /// deductions in one transaction. Any insufficient stock aborts the whole
    /// creation with nothing persisted. Alerts (downtime over threshold,
    /// stock below critical) are emitted only after the commit.
    #[instrument(skip(self, request), fields(reporter_id))]
    pub async fn create(
        &self,
        reporter_id: i32,
        reporter_email: Option<String>,
        request: CreateGeneralFaultRequest,
    ) -> Result<GeneralFaultView, ServiceError> {
        request.validate()?;

        for usage in &request.stock_usages {
            if usage.amount <= 0 {
                return Err(ServiceError::ValidationError(
                    "Stock usage amounts must be positive".to_string(),
                ));
            }
        }

        let occurred_at = request.occurred_at.unwrap_or_else(Utc::now);
        let db = self.db.as_ref();

        // Validate referenced lines up front so a bad id is a 400, not a
        // foreign key violation
        for line in &request.lines {
            let exists = production_line::Entity::find_by_id(line.line_id)
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?;
            if exists.is_none() {
                return Err(ServiceError::ValidationError(format!(
                    "Production line {} does not exist",
                    line.line_id
                )));
            }
        }

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for general fault creation");
            ServiceError::DatabaseError(e)
        })?;

        let fault = general_fault::ActiveModel {
            description: Set(request.description.clone()),
            location: Set(request.location.clone()),
            production_impact: Set(request.production_impact),
            occurred_at: Set(occurred_at),
            reported_by: Set(reporter_id),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::DatabaseError)?;

        for line in &request.lines {
            general_fault_line::ActiveModel {
                general_fault_id: Set(fault.id),
                line_id: Set(line.line_id),
                downtime_min: Set(line.downtime_min),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        }

        for file in &request.files {
            fault_file::ActiveModel {
                general_fault_id: Set(fault.id),
                url: Set(file.url.clone()),
                file_name: Set(file.file_name.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        }

        // Spare-part deductions ride in the same transaction: one short part
        // aborts the fault report entirely
        let mut critical_alerts = Vec::new();
        for usage in &request.stock_usages {
            let stock = stock::Entity::find_by_id(usage.stock_id)
                .one(&txn)
                .await
                .map_err(ServiceError::DatabaseError)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Stock with id {} not found", usage.stock_id))
                })?;

            if stock.quantity < usage.amount {
                return Err(ServiceError::InsufficientStock(format!(
                    "{}: requested {}, available {}",
                    stock.name, usage.amount, stock.quantity
                )));
            }

            stock_usage::ActiveModel {
                stock_id: Set(usage.stock_id),
                amount: Set(usage.amount),
                used_at: Set(occurred_at),
                general_fault_id: Set(Some(fault.id)),
                fault_record_id: Set(None),
                user_id: Set(Some(reporter_id)),
                note: Set(usage.note.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

            let remaining = stock.quantity - usage.amount;
            let critical_level = stock.critical_level;
            let stock_name = stock.name.clone();

            let mut active: stock::ActiveModel = stock.into();
            active.quantity = Set(remaining);
            active
                .update(&txn)
                .await
                .map_err(ServiceError::DatabaseError)?;

            if remaining < critical_level {
                critical_alerts.push((usage.stock_id, stock_name, remaining, critical_level));
            }
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, fault_id = fault.id, "Failed to commit general fault creation");
            ServiceError::DatabaseError(e)
        })?;

        info!(fault_id = fault.id, "General fault created");
        self.emit(Event::GeneralFaultCreated(fault.id)).await;

        // Post-commit alerts: worst offending line first
        if let Some(worst) = request
            .lines
            .iter()
            .filter(|l| l.downtime_min > self.downtime_alert_threshold_min)
            .max_by_key(|l| l.downtime_min)
        {
            let line_name = production_line::Entity::find_by_id(worst.line_id)
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .map(|l| l.name)
                .unwrap_or_else(|| format!("line {}", worst.line_id));

            self.emit(Event::DowntimeExceeded {
                general_fault_id: fault.id,
                description: request.description.clone(),
                line_name,
                downtime_min: worst.downtime_min,
                threshold_min: self.downtime_alert_threshold_min,
            })
            .await;
        }

        for (stock_id, stock_name, remaining, critical_level) in critical_alerts {
            self.emit(Event::StockBelowCritical {
                stock_id,
                stock_name,
                remaining,
                critical_level,
                used_by: reporter_email.clone(),
                note: None,
                used_at: occurred_at,
            })
            .await;
        }

        self.get(fault.id).await
    }

    /// Deletes a fault and its dependent rows. Consumed stock stays consumed;
    /// removing the report does not refill the shelf.
    #[instrument(skip(self))]
    pub async fn delete(&self, fault_id: i32) -> Result<(), ServiceError> {
        let fault = general_fault::Entity::find_by_id(fault_id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("General fault with id {} not found", fault_id))
            })?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        stock_usage::Entity::delete_many()
            .filter(stock_usage::Column::GeneralFaultId.eq(fault_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        general_fault_line::Entity::delete_many()
            .filter(general_fault_line::Column::GeneralFaultId.eq(fault_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        fault_file::Entity::delete_many()
            .filter(fault_file::Column::GeneralFaultId.eq(fault_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        general_fault::Entity::delete_by_id(fault.id)
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(fault_id, "General fault deleted");
        self.emit(Event::GeneralFaultDeleted(fault_id)).await;
        Ok(())
    }

    async fn attach_relations(
        &self,
        faults: Vec<general_fault::Model>,
    ) -> Result<Vec<GeneralFaultView>, ServiceError> {
        let db = self.db.as_ref();

        let reporters = faults
            .load_one(user::Entity, db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let line_rows = faults
            .load_many(general_fault_line::Entity, db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let file_rows = faults
            .load_many(fault_file::Entity, db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut views = Vec::with_capacity(faults.len());
        for ((fault, reporter), (lines, files)) in faults
            .into_iter()
            .zip(reporters)
            .zip(line_rows.into_iter().zip(file_rows))
        {
            let line_details = lines
                .load_one(production_line::Entity, db)
                .await
                .map_err(ServiceError::DatabaseError)?;

            let lines = lines
                .into_iter()
                .zip(line_details)
                .filter_map(|(assoc, detail)| {
                    detail.map(|line| FaultLineView {
                        id: assoc.id,
                        downtime_min: assoc.downtime_min,
                        line,
                    })
                })
                .collect();

            views.push(GeneralFaultView {
                fault,
                reporter: reporter.map(|u| FaultReporterRef {
                    id: u.id,
                    email: u.email,
                    role: u.role,
                }),
                lines,
                files,
            });
        }

        Ok(views)
    }
}
