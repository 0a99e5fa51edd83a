pub mod action_logs;
pub mod analytics;
pub mod announcements;
pub mod auth;
pub mod control_devices;
pub mod fault_types;
pub mod general_faults;
pub mod motors;
pub mod production_lines;
pub mod production_stops;
pub mod records;
pub mod stock_usages;
pub mod stocks;
pub mod users;

use std::sync::Arc;

use crate::{
    auth::AuthService,
    config::AppConfig,
    db::DbPool,
    events::EventSender,
    services::{
        action_logs::ActionLogService, analytics::AnalyticsService,
        general_faults::GeneralFaultService, records::RecordService, stocks::StockService,
        users::UserService,
    },
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub records: Arc<RecordService>,
    pub stocks: Arc<StockService>,
    pub general_faults: Arc<GeneralFaultService>,
    pub action_logs: Arc<ActionLogService>,
    pub analytics: Arc<AnalyticsService>,
}

impl AppServices {
    pub fn new(
        db: Arc<DbPool>,
        event_sender: EventSender,
        auth: Arc<AuthService>,
        cfg: &AppConfig,
    ) -> Self {
        let users = Arc::new(UserService::new(db.clone(), auth.clone()));
        let records = Arc::new(RecordService::new(
            db.clone(),
            Some(event_sender.clone()),
            cfg.fault_recurrence_alert_count,
        ));
        let stocks = Arc::new(StockService::new(db.clone(), Some(event_sender.clone())));
        let general_faults = Arc::new(GeneralFaultService::new(
            db.clone(),
            Some(event_sender),
            cfg.downtime_alert_threshold_min,
        ));
        let action_logs = Arc::new(ActionLogService::new(db.clone()));
        let analytics = Arc::new(AnalyticsService::new(db));

        Self {
            auth,
            users,
            records,
            stocks,
            general_faults,
            action_logs,
            analytics,
        }
    }
}
