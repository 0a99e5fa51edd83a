use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use sea_orm::sea_query::Expr;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    entities::{fault_record, general_fault, general_fault_line, motor, stock},
    errors::ServiceError,
};

/// Window used for the recency-weighted parts of the health score.
const HEALTH_WINDOW_DAYS: i64 = 90;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FleetMetrics {
    pub motor_count: i64,
    pub active_motor_count: i64,
    pub fault_records_this_month: i64,
    pub general_faults_this_month: i64,
    pub downtime_min_this_month: i64,
    pub stocks_below_critical: i64,
}

/// Per-motor reliability summary for the dashboard table.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MotorHealth {
    pub motor_id: i32,
    pub name: String,
    pub serial: String,
    pub fault_count: i64,
    /// Mean time between faults in hours; None until a motor has at least
    /// two records
    pub mtbf_hours: Option<f64>,
    /// 0-100 heuristic combining recent fault frequency, recent downtime and
    /// service recency
    pub health_score: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardMetrics {
    pub fleet: FleetMetrics,
    pub motors: Vec<MotorHealth>,
    pub generated_at: DateTime<Utc>,
}

/// Dashboard aggregates. Everything here is counts, sums and means over
/// fetched rows; the fleet is small enough that in-memory aggregation beats
/// hand-written SQL for maintainability.
#[derive(Clone)]
pub struct AnalyticsService {
    db: Arc<DbPool>,
}

impl AnalyticsService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Get the full dashboard payload
    #[instrument(skip(self))]
    pub async fn get_dashboard_metrics(&self) -> Result<DashboardMetrics, ServiceError> {
        info!("Generating dashboard metrics");

        let fleet = self.get_fleet_metrics().await?;
        let motors = self.get_motor_health().await?;

        Ok(DashboardMetrics {
            fleet,
            motors,
            generated_at: Utc::now(),
        })
    }

    #[instrument(skip(self))]
    pub async fn get_fleet_metrics(&self) -> Result<FleetMetrics, ServiceError> {
        let db = self.db.as_ref();
        let month_start = Utc::now() - Duration::days(30);

        let motor_count = motor::Entity::find()
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let active_motor_count = motor::Entity::find()
            .filter(motor::Column::IsActive.eq(true))
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let fault_records_this_month = fault_record::Entity::find()
            .filter(fault_record::Column::OccurredAt.gte(month_start))
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let recent_faults = general_fault::Entity::find()
            .filter(general_fault::Column::OccurredAt.gte(month_start))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let general_faults_this_month = recent_faults.len() as i64;

        let downtime_min_this_month = if recent_faults.is_empty() {
            0
        } else {
            let fault_ids: Vec<i32> = recent_faults.iter().map(|f| f.id).collect();
            general_fault_line::Entity::find()
                .filter(general_fault_line::Column::GeneralFaultId.is_in(fault_ids))
                .all(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .iter()
                .map(|l| l.downtime_min as i64)
                .sum()
        };

        let stocks_below_critical = stock::Entity::find()
            .filter(Expr::col(stock::Column::Quantity).lt(Expr::col(stock::Column::CriticalLevel)))
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(FleetMetrics {
            motor_count: motor_count as i64,
            active_motor_count: active_motor_count as i64,
            fault_records_this_month: fault_records_this_month as i64,
            general_faults_this_month,
            downtime_min_this_month,
            stocks_below_critical: stocks_below_critical as i64,
        })
    }

    /// Per-motor MTBF and health scores
    #[instrument(skip(self))]
    pub async fn get_motor_health(&self) -> Result<Vec<MotorHealth>, ServiceError> {
        let db = self.db.as_ref();
        let now = Utc::now();
        let window_start = now - Duration::days(HEALTH_WINDOW_DAYS);

        let motors = motor::Entity::find()
            .order_by_asc(motor::Column::Name)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut result = Vec::with_capacity(motors.len());
        for m in motors {
            let mut records = fault_record::Entity::find()
                .filter(fault_record::Column::MotorId.eq(m.id))
                .order_by_asc(fault_record::Column::OccurredAt)
                .all(db)
                .await
                .map_err(ServiceError::DatabaseError)?;
            records.sort_by_key(|r| r.occurred_at);

            let fault_count = records.len() as i64;
            let mtbf_hours = mean_time_between(&records);

            let recent: Vec<&fault_record::Model> = records
                .iter()
                .filter(|r| r.occurred_at >= window_start)
                .collect();
            let recent_fault_count = recent.len() as i64;
            let recent_downtime_min: i64 = recent
                .iter()
                .map(|r| r.duration_min.unwrap_or(0) as i64)
                .sum();
            let service_overdue = m.next_service.map(|due| due < now).unwrap_or(false);

            let health_score =
                health_score(recent_fault_count, recent_downtime_min, service_overdue);

            result.push(MotorHealth {
                motor_id: m.id,
                name: m.name,
                serial: m.serial,
                fault_count,
                mtbf_hours,
                health_score,
            });
        }

        Ok(result)
    }
}

/// Mean gap between successive fault records, in hours.
fn mean_time_between(records: &[fault_record::Model]) -> Option<f64> {
    if records.len() < 2 {
        return None;
    }

    let total_hours: i64 = records
        .windows(2)
        .map(|pair| (pair[1].occurred_at - pair[0].occurred_at).num_hours())
        .sum();

    Some(total_hours as f64 / (records.len() - 1) as f64)
}

/// Health heuristic: start at 100, lose points for recent fault frequency
/// and downtime, and a flat penalty for an overdue service.
fn health_score(recent_fault_count: i64, recent_downtime_min: i64, service_overdue: bool) -> i32 {
    let fault_penalty = (recent_fault_count * 12).min(60);
    let downtime_penalty = (recent_downtime_min / 30).min(25);
    let service_penalty = if service_overdue { 15 } else { 0 };

    (100 - fault_penalty - downtime_penalty - service_penalty).clamp(0, 100) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_at(hours: i64) -> fault_record::Model {
        fault_record::Model {
            id: hours as i32,
            user_id: 1,
            motor_id: 1,
            fault_type_id: 1,
            description: "test".into(),
            duration_min: None,
            occurred_at: DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc)
                + Duration::hours(hours),
        }
    }

    #[test]
    fn mtbf_needs_two_records() {
        assert_eq!(mean_time_between(&[]), None);
        assert_eq!(mean_time_between(&[record_at(0)]), None);
    }

    #[test]
    fn mtbf_is_mean_of_gaps() {
        // Gaps of 10h and 20h, mean 15h
        let records = vec![record_at(0), record_at(10), record_at(30)];
        assert_eq!(mean_time_between(&records), Some(15.0));
    }

    #[test]
    fn health_score_penalties() {
        assert_eq!(health_score(0, 0, false), 100);
        assert_eq!(health_score(2, 0, false), 76);
        assert_eq!(health_score(0, 0, true), 85);
        assert_eq!(health_score(1, 60, false), 86);
        // Penalties are capped so the score never goes below zero
        assert_eq!(health_score(100, 100_000, true), 0);
    }
}
