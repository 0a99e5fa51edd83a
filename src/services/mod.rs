pub mod action_logs;
pub mod analytics;
pub mod general_faults;
pub mod records;
pub mod stocks;
pub mod users;
