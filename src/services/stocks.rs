use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, LoaderTrait, ModelTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{fault_record, general_fault, stock, stock_usage, user},
    errors::ServiceError,
    events::{Event, EventSender},
};

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateStockRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub quantity: i32,
    pub unit: Option<String>,
    #[validate(range(min = 0))]
    pub critical_level: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStockRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub unit: Option<String>,
    pub critical_level: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct RecordUsageRequest {
    pub stock_id: i32,
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i32,
    pub used_at: Option<DateTime<Utc>>,
    pub general_fault_id: Option<i32>,
    pub fault_record_id: Option<i32>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UsageFilter {
    pub stock_id: Option<i32>,
    pub user_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct UsageUserRef {
    pub id: i32,
    pub email: String,
}

/// Usage row with its related stock, user and fault links, matching what the
/// consumption ledger page renders.
#[derive(Debug, Serialize)]
pub struct StockUsageView {
    #[serde(flatten)]
    pub usage: stock_usage::Model,
    pub stock: Option<stock::Model>,
    pub user: Option<UsageUserRef>,
    pub general_fault: Option<general_fault::Model>,
    pub fault_record: Option<fault_record::Model>,
}

/// Spare-part stock control. Usage recording and reversal are the only paths
/// that mutate `quantity` outside a plain admin edit, and both run as single
/// transactions so the ledger and the on-hand count can never diverge.
#[derive(Clone)]
pub struct StockService {
    db: Arc<DbPool>,
    event_sender: Option<EventSender>,
}

impl StockService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!("Failed to send stock event: {}", e);
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<stock::Model>, ServiceError> {
        stock::Entity::find()
            .order_by_asc(stock::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, stock_id: i32) -> Result<stock::Model, ServiceError> {
        stock::Entity::find_by_id(stock_id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Stock with id {} not found", stock_id)))
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateStockRequest) -> Result<stock::Model, ServiceError> {
        request.validate()?;

        let model = stock::ActiveModel {
            name: Set(request.name),
            description: Set(request.description),
            quantity: Set(request.quantity),
            unit: Set(request.unit),
            critical_level: Set(request.critical_level),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        stock_id: i32,
        request: UpdateStockRequest,
    ) -> Result<stock::Model, ServiceError> {
        let existing = self.get(stock_id).await?;

        let mut active: stock::ActiveModel = existing.into();
        if let Some(v) = request.name {
            active.name = Set(v);
        }
        if let Some(v) = request.description {
            active.description = Set(Some(v));
        }
        if let Some(v) = request.quantity {
            if v < 0 {
                return Err(ServiceError::ValidationError(
                    "Quantity cannot be negative".to_string(),
                ));
            }
            active.quantity = Set(v);
        }
        if let Some(v) = request.unit {
            active.unit = Set(Some(v));
        }
        if let Some(v) = request.critical_level {
            active.critical_level = Set(v);
        }

        active
            .update(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Deletes a stock row together with its ledger entries.
    #[instrument(skip(self))]
    pub async fn delete(&self, stock_id: i32) -> Result<(), ServiceError> {
        let existing = self.get(stock_id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        stock_usage::Entity::delete_many()
            .filter(stock_usage::Column::StockId.eq(stock_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let name = existing.name.clone();
        existing
            .delete(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;
        info!(stock_id, "Stock deleted: {}", name);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_usages(
        &self,
        filter: UsageFilter,
    ) -> Result<Vec<StockUsageView>, ServiceError> {
        let db = self.db.as_ref();

        let mut query = stock_usage::Entity::find();
        if let Some(stock_id) = filter.stock_id {
            query = query.filter(stock_usage::Column::StockId.eq(stock_id));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(stock_usage::Column::UserId.eq(user_id));
        }

        let usages = query
            .order_by_desc(stock_usage::Column::UsedAt)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.attach_usage_relations(usages).await
    }

    #[instrument(skip(self))]
    pub async fn get_usage(&self, usage_id: i32) -> Result<StockUsageView, ServiceError> {
        let usage = stock_usage::Entity::find_by_id(usage_id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Stock usage with id {} not found", usage_id))
            })?;

        let mut views = self.attach_usage_relations(vec![usage]).await?;
        Ok(views.remove(0))
    }

    /// Records a consumption: checks availability, inserts the ledger row and
    /// decrements the stock inside one transaction. The quantity can never go
    /// negative; an insufficient balance rolls the whole thing back. The
    /// critical-level alert fires only after a successful commit.
    #[instrument(skip(self, request), fields(stock_id = request.stock_id, amount = request.amount))]
    pub async fn record_usage(
        &self,
        user_id: i32,
        user_email: Option<String>,
        request: RecordUsageRequest,
    ) -> Result<StockUsageView, ServiceError> {
        request.validate()?;

        let used_at = request.used_at.unwrap_or_else(Utc::now);

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to start transaction for stock usage");
                ServiceError::DatabaseError(e)
            })?;

        let stock = stock::Entity::find_by_id(request.stock_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Stock with id {} not found", request.stock_id))
            })?;

        if stock.quantity < request.amount {
            // Dropping the transaction rolls it back
            return Err(ServiceError::InsufficientStock(format!(
                "{}: requested {}, available {}",
                stock.name, request.amount, stock.quantity
            )));
        }

        let usage = stock_usage::ActiveModel {
            stock_id: Set(request.stock_id),
            amount: Set(request.amount),
            used_at: Set(used_at),
            general_fault_id: Set(request.general_fault_id),
            fault_record_id: Set(request.fault_record_id),
            user_id: Set(Some(user_id)),
            note: Set(request.note.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::DatabaseError)?;

        let remaining = stock.quantity - request.amount;
        let critical_level = stock.critical_level;
        let stock_name = stock.name.clone();

        let mut stock_active: stock::ActiveModel = stock.into();
        stock_active.quantity = Set(remaining);
        stock_active
            .update(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit stock usage transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            usage_id = usage.id,
            remaining, "Stock usage recorded for {}", stock_name
        );

        self.emit(Event::StockUsageRecorded {
            usage_id: usage.id,
            stock_id: usage.stock_id,
            amount: usage.amount,
        })
        .await;

        if remaining < critical_level {
            self.emit(Event::StockBelowCritical {
                stock_id: usage.stock_id,
                stock_name,
                remaining,
                critical_level,
                used_by: user_email,
                note: request.note,
                used_at,
            })
            .await;
        }

        let mut views = self.attach_usage_relations(vec![usage]).await?;
        Ok(views.remove(0))
    }

    /// Deletes a ledger entry and restores its amount to the stock, as one
    /// transaction.
    #[instrument(skip(self))]
    pub async fn delete_usage(&self, usage_id: i32) -> Result<(), ServiceError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        let usage = stock_usage::Entity::find_by_id(usage_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Stock usage with id {} not found", usage_id))
            })?;

        let stock = stock::Entity::find_by_id(usage.stock_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        // The stock may have been deleted since; restoring is best-effort then
        if let Some(stock) = stock {
            let restored = stock.quantity + usage.amount;
            let mut active: stock::ActiveModel = stock.into();
            active.quantity = Set(restored);
            active
                .update(&txn)
                .await
                .map_err(ServiceError::DatabaseError)?;
        }

        let stock_id = usage.stock_id;
        let amount = usage.amount;
        usage
            .delete(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(usage_id, stock_id, amount, "Stock usage reverted");
        self.emit(Event::StockUsageReverted {
            usage_id,
            stock_id,
            amount,
        })
        .await;

        Ok(())
    }

    async fn attach_usage_relations(
        &self,
        usages: Vec<stock_usage::Model>,
    ) -> Result<Vec<StockUsageView>, ServiceError> {
        let db = self.db.as_ref();

        let stocks = usages
            .load_one(stock::Entity, db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let users = usages
            .load_one(user::Entity, db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let faults = usages
            .load_one(general_fault::Entity, db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let records = usages
            .load_one(fault_record::Entity, db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(usages
            .into_iter()
            .zip(stocks)
            .zip(users)
            .zip(faults)
            .zip(records)
            .map(|((((usage, stock), user), fault), record)| StockUsageView {
                usage,
                stock,
                user: user.map(|u| UsageUserRef {
                    id: u.id,
                    email: u.email,
                }),
                general_fault: fault,
                fault_record: record,
            })
            .collect())
    }
}
