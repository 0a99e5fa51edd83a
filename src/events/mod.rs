use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::alerts::AlertMailer;

/// Events emitted by the service layer. Alert-worthy variants are forwarded
/// to the mail gateway by the processing loop; the rest are logged for
/// traceability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Auth events
    UserRegistered(i32),
    UserLoggedIn(i32),
    PasswordChanged(i32),

    // Registry events
    MotorCreated(i32),
    MotorUpdated(i32),
    MotorDeleted(i32),
    ControlDeviceCreated(i32),
    ControlDeviceUpdated(i32),
    ControlDeviceDeleted(i32),

    // Fault events
    FaultRecorded {
        record_id: i32,
        motor_id: i32,
        fault_type_id: i32,
    },
    /// The same motor + fault-type pair has recurred enough times to warrant
    /// a maintenance review.
    FaultRecurrence {
        motor_id: i32,
        motor_name: String,
        fault_type: String,
        occurrences: u64,
    },
    GeneralFaultCreated(i32),
    GeneralFaultDeleted(i32),
    /// A general fault held a production line down past the alert threshold.
    DowntimeExceeded {
        general_fault_id: i32,
        description: String,
        line_name: String,
        downtime_min: i32,
        threshold_min: i32,
    },

    // Stock events
    StockUsageRecorded {
        usage_id: i32,
        stock_id: i32,
        amount: i32,
    },
    StockUsageReverted {
        usage_id: i32,
        stock_id: i32,
        amount: i32,
    },
    /// A usage drove the remaining quantity below the stock's critical level.
    StockBelowCritical {
        stock_id: i32,
        stock_name: String,
        remaining: i32,
        critical_level: i32,
        used_by: Option<String>,
        note: Option<String>,
        used_at: DateTime<Utc>,
    },

    // Misc
    AnnouncementPosted(i32),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel. Alert events become mail-gateway deliveries
/// (fire-and-forget: a failed send is logged, never retried here beyond the
/// mailer's own bounded retry, and never surfaced to the request that emitted
/// the event). Everything else is logged.
pub async fn process_events(mut rx: mpsc::Receiver<Event>, mailer: Option<AlertMailer>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match event {
            Event::StockBelowCritical {
                stock_id,
                ref stock_name,
                remaining,
                critical_level,
                ref used_by,
                ref note,
                used_at,
            } => {
                warn!(
                    stock_id,
                    remaining, critical_level, "Stock fell below critical level: {}", stock_name
                );
                if let Some(mailer) = &mailer {
                    mailer.send_stock_critical(
                        stock_name,
                        remaining,
                        critical_level,
                        used_by.as_deref(),
                        note.as_deref(),
                        used_at,
                    );
                }
            }
            Event::DowntimeExceeded {
                general_fault_id,
                ref description,
                ref line_name,
                downtime_min,
                threshold_min,
            } => {
                warn!(
                    general_fault_id,
                    downtime_min,
                    threshold_min,
                    "Line downtime exceeded threshold on {}",
                    line_name
                );
                if let Some(mailer) = &mailer {
                    mailer.send_downtime_exceeded(
                        general_fault_id,
                        description,
                        line_name,
                        downtime_min,
                        threshold_min,
                    );
                }
            }
            Event::FaultRecurrence {
                motor_id,
                ref motor_name,
                ref fault_type,
                occurrences,
            } => {
                warn!(
                    motor_id,
                    occurrences, "Recurring fault on motor {}: {}", motor_name, fault_type
                );
                if let Some(mailer) = &mailer {
                    mailer.send_fault_recurrence(motor_name, fault_type, occurrences);
                }
            }
            other => {
                info!("Received event: {:?}", other);
            }
        }
    }

    error!("Event channel closed; event processing loop exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_sender_delivers_to_channel() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        sender.send(Event::MotorCreated(7)).await.unwrap();

        match rx.recv().await {
            Some(Event::MotorCreated(id)) => assert_eq!(id, 7),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn event_sender_reports_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        let result = sender.send(Event::MotorDeleted(1)).await;
        assert!(result.is_err());
    }
}
