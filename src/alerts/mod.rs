use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::config::AppConfig;
use crate::errors::ServiceError;

/// Outbound mail payload posted to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// HMAC signature generator for mail gateway authentication
pub struct SignatureGenerator {
    secret: String,
}

impl SignatureGenerator {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Generate HMAC signature for a payload
    pub fn sign_payload(&self, timestamp: &str, body: &str) -> String {
        use hmac::{Hmac, Mac};
        use sha2::Sha256;

        type HmacSha256 = Hmac<Sha256>;

        let signed_payload = format!("{}.{}", timestamp, body);
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signed_payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

/// Alert mail delivery over the plant's HTTP mail gateway. Sends are
/// fire-and-forget with bounded retry; a lost alert shows up in the logs and
/// nowhere else.
#[derive(Clone)]
pub struct AlertMailer {
    client: reqwest::Client,
    gateway_url: String,
    from: String,
    recipients: Vec<String>,
    signature_generator: Option<Arc<SignatureGenerator>>,
    max_retries: u32,
}

impl AlertMailer {
    pub fn new(
        gateway_url: String,
        from: String,
        recipients: Vec<String>,
        secret: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("reqwest client with static configuration"),
            gateway_url,
            from,
            recipients,
            signature_generator: secret.map(|s| Arc::new(SignatureGenerator::new(s))),
            max_retries: 3,
        }
    }

    /// Builds a mailer from config; `None` when no gateway is configured,
    /// which disables alert delivery without touching the callers.
    pub fn from_config(cfg: &AppConfig) -> Option<Self> {
        let gateway_url = cfg.mail_gateway_url.clone()?;
        Some(Self::new(
            gateway_url,
            cfg.mail_from.clone(),
            cfg.alert_recipient_list(),
            cfg.mail_gateway_secret.clone(),
        ))
    }

    /// Critical stock alert, mirroring what the storeroom expects to read on
    /// their phone: what ran low, how much is left, who used it last.
    pub fn send_stock_critical(
        &self,
        stock_name: &str,
        remaining: i32,
        critical_level: i32,
        used_by: Option<&str>,
        note: Option<&str>,
        used_at: DateTime<Utc>,
    ) {
        let subject = format!("[CRITICAL] Stock below critical level: {}", stock_name);
        let html = format!(
            "<h2>Critical stock alert</h2>\
             <ul>\
             <li><b>Item:</b> {}</li>\
             <li><b>Remaining:</b> {}</li>\
             <li><b>Critical level:</b> {}</li>\
             <li><b>Last usage note:</b> {}</li>\
             <li><b>Used by:</b> {}</li>\
             <li><b>Used at:</b> {}</li>\
             </ul>\
             <p>Restocking is required as soon as possible.</p>",
            stock_name,
            remaining,
            critical_level,
            note.unwrap_or("-"),
            used_by.unwrap_or("-"),
            used_at.to_rfc3339(),
        );
        self.send_async(subject, html);
    }

    /// Downtime alert for a general fault that held a line down past the
    /// configured threshold.
    pub fn send_downtime_exceeded(
        &self,
        general_fault_id: i32,
        description: &str,
        line_name: &str,
        downtime_min: i32,
        threshold_min: i32,
    ) {
        let subject = format!(
            "[DOWNTIME] {} down {} min (fault #{})",
            line_name, downtime_min, general_fault_id
        );
        let html = format!(
            "<h2>Line downtime alert</h2>\
             <ul>\
             <li><b>Line:</b> {}</li>\
             <li><b>Downtime:</b> {} min (threshold {} min)</li>\
             <li><b>Fault:</b> #{} — {}</li>\
             </ul>",
            line_name, downtime_min, threshold_min, general_fault_id, description,
        );
        self.send_async(subject, html);
    }

    /// Recurrence alert when the same motor keeps failing the same way.
    pub fn send_fault_recurrence(&self, motor_name: &str, fault_type: &str, occurrences: u64) {
        let subject = format!(
            "[RECURRING] {} has failed {} times with {}",
            motor_name, occurrences, fault_type
        );
        let html = format!(
            "<h2>Recurring fault alert</h2>\
             <p>Motor <b>{}</b> has now logged <b>{}</b> faults of type <b>{}</b>. \
             Schedule an inspection before the next failure.</p>",
            motor_name, occurrences, fault_type,
        );
        self.send_async(subject, html);
    }

    /// Send mail asynchronously (fire-and-forget with logging)
    pub fn send_async(&self, subject: String, html: String) {
        if self.recipients.is_empty() {
            warn!("Alert mail suppressed, no recipients configured: {subject}");
            return;
        }

        let mailer = self.clone();
        let message = MailMessage {
            from: self.from.clone(),
            to: self.recipients.clone(),
            subject,
            html,
        };

        tokio::spawn(async move {
            if let Err(e) = mailer.deliver(&message).await {
                error!("Async alert mail delivery failed: {}", e);
            }
        });
    }

    /// Deliver with bounded retry and exponential backoff
    #[instrument(skip(self, message), fields(subject = %message.subject))]
    async fn deliver(&self, message: &MailMessage) -> Result<(), ServiceError> {
        let body = serde_json::to_string(message)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;

        let timestamp = Utc::now().to_rfc3339();
        let signature = self
            .signature_generator
            .as_ref()
            .map(|gen| gen.sign_payload(&timestamp, &body));

        for attempt in 1..=self.max_retries {
            let mut request = self
                .client
                .post(&self.gateway_url)
                .header("Content-Type", "application/json")
                .header("Timestamp", &timestamp)
                .body(body.clone());

            if let Some(ref sig) = signature {
                request = request.header("Gateway-Signature", sig);
            }

            match request.send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        info!("Alert mail delivered: {}", message.subject);
                        return Ok(());
                    } else {
                        warn!(
                            "Mail gateway returned status {} (attempt {}/{})",
                            response.status(),
                            attempt,
                            self.max_retries
                        );
                    }
                }
                Err(e) => {
                    warn!(
                        "Mail gateway delivery error: {} (attempt {}/{})",
                        e, attempt, self.max_retries
                    );
                }
            }

            if attempt < self.max_retries {
                let backoff = Duration::from_secs(2_u64.pow(attempt - 1));
                tokio::time::sleep(backoff).await;
            }
        }

        error!(
            "Alert mail delivery failed after {} attempts",
            self.max_retries
        );
        Err(ServiceError::InternalError(format!(
            "Failed to deliver alert mail after {} retries",
            self.max_retries
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mail_message_serialization() {
        let message = MailMessage {
            from: "alerts@plantops.dev".to_string(),
            to: vec!["shift-lead@plantops.dev".to_string()],
            subject: "[CRITICAL] Stock below critical level: bearing 6204".to_string(),
            html: "<h2>Critical stock alert</h2>".to_string(),
        };

        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains("bearing 6204"));
        assert!(json.contains("shift-lead@plantops.dev"));
    }

    #[test]
    fn signature_generation() {
        let generator = SignatureGenerator::new("test_secret".to_string());
        let timestamp = "2025-01-01T00:00:00Z";
        let body = r#"{"subject":"[CRITICAL] test"}"#;

        let sig = generator.sign_payload(timestamp, body);
        assert!(!sig.is_empty());
        assert_eq!(sig.len(), 64); // SHA256 produces 32 bytes = 64 hex chars

        // Same inputs, same signature; different body, different signature
        assert_eq!(sig, generator.sign_payload(timestamp, body));
        assert_ne!(sig, generator.sign_payload(timestamp, "{}"));
    }

    #[test]
    fn mailer_from_config_requires_gateway_url() {
        let cfg = crate::config::AppConfig::new(
            "sqlite://plantops.db?mode=memory".into(),
            "k9PzQ2vT8mW4nR6xJ1cF5bY7dH3gL0sA_k9PzQ2vT8mW4nR6xJ1cF5bY7dH3gL0sA".into(),
            3600,
            "127.0.0.1".into(),
            5000,
            "development".into(),
        );
        assert!(AlertMailer::from_config(&cfg).is_none());

        let mut cfg = cfg;
        cfg.mail_gateway_url = Some("https://mail.plantops.dev/send".into());
        cfg.alert_recipients = Some("maintenance@plantops.dev".into());
        assert!(AlertMailer::from_config(&cfg).is_some());
    }
}
