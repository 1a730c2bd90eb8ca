//! Delivery of one alert message to each of its resolved recipients.
//!
//! The caller walks the recipients in order and calls
//! [`Dispatcher::attempt`] for each, so it can record every outcome before
//! the next send. Each send is bounded by the dispatcher's timeout. A failed
//! or timed-out send is reported in its [`DeliveryResult`]; an attempt
//! itself cannot fail.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use glucotrack_core::alert::ContactType;
use glucotrack_core::types::DbId;
use serde::Serialize;

use crate::sms::{SmsConfig, SmsError, SmsSender, TwilioSms};

/// Upper bound on a single provider call.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// A contact the alert should reach.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipient {
    pub contact_type: ContactType,
    pub contact_id: DbId,
    pub name: String,
    pub phone: Option<String>,
}

/// Why a send did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotConfigured,
    NoPhone,
    Rejected,
    Timeout,
    Transport,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::NotConfigured => "not_configured",
            FailureKind::NoPhone => "no_phone",
            FailureKind::Rejected => "rejected",
            FailureKind::Timeout => "timeout",
            FailureKind::Transport => "transport",
        }
    }

    fn of(err: &SmsError) -> Self {
        match err {
            SmsError::NotConfigured => FailureKind::NotConfigured,
            SmsError::MissingPhone => FailureKind::NoPhone,
            SmsError::Rejected { .. } => FailureKind::Rejected,
            SmsError::Timeout(_) => FailureKind::Timeout,
            SmsError::Request(e) if e.is_timeout() => FailureKind::Timeout,
            SmsError::Request(_) => FailureKind::Transport,
        }
    }
}

/// Outcome of one send attempt.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryResult {
    pub contact_type: ContactType,
    pub contact_id: DbId,
    pub to_name: String,
    pub to_phone: Option<String>,
    pub success: bool,
    pub error: Option<String>,
    pub error_kind: Option<FailureKind>,
    pub provider_message_id: Option<String>,
    pub attempted_at: DateTime<Utc>,
}

/// Sends alert messages through an optional SMS provider.
#[derive(Clone)]
pub struct Dispatcher {
    sender: Option<Arc<dyn SmsSender>>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(sender: Option<Arc<dyn SmsSender>>, timeout: Duration) -> Self {
        Self { sender, timeout }
    }

    /// Build from `TWILIO_*` and `SMS_TIMEOUT_SECS` (default 10).
    ///
    /// Missing credentials yield an unconfigured dispatcher; only a client
    /// construction failure is an error.
    pub fn from_env() -> Result<Self, SmsError> {
        let timeout = std::env::var("SMS_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SEND_TIMEOUT);

        let sender = match SmsConfig::from_env() {
            Some(config) => {
                tracing::info!(timeout_secs = timeout.as_secs(), "SMS delivery enabled");
                Some(Arc::new(TwilioSms::new(config, timeout)?) as Arc<dyn SmsSender>)
            }
            None => {
                tracing::warn!("Twilio credentials not set, alert SMS delivery disabled");
                None
            }
        };
        Ok(Self::new(sender, timeout))
    }

    /// Whether a provider is configured.
    pub fn is_configured(&self) -> bool {
        self.sender.is_some()
    }

    /// Make one send attempt to `recipient`. Never fails; the outcome is in
    /// the returned result.
    pub async fn attempt(&self, recipient: &Recipient, body: &str) -> DeliveryResult {
        let attempted_at = Utc::now();
        let provider = self.sender.as_ref().map(|s| s.name()).unwrap_or("none");

        match self.send_one(recipient, body).await {
            Ok(receipt) => {
                tracing::info!(
                    provider,
                    contact_type = %recipient.contact_type,
                    contact_id = recipient.contact_id,
                    "Alert SMS sent"
                );
                DeliveryResult {
                    contact_type: recipient.contact_type,
                    contact_id: recipient.contact_id,
                    to_name: recipient.name.clone(),
                    to_phone: recipient.phone.clone(),
                    success: true,
                    error: None,
                    error_kind: None,
                    provider_message_id: receipt.provider_message_id,
                    attempted_at,
                }
            }
            Err(e) => {
                let kind = FailureKind::of(&e);
                if kind != FailureKind::NotConfigured {
                    tracing::warn!(
                        provider,
                        contact_type = %recipient.contact_type,
                        contact_id = recipient.contact_id,
                        error_kind = kind.as_str(),
                        error = %e,
                        "Alert SMS failed"
                    );
                }
                DeliveryResult {
                    contact_type: recipient.contact_type,
                    contact_id: recipient.contact_id,
                    to_name: recipient.name.clone(),
                    to_phone: recipient.phone.clone(),
                    success: false,
                    error: Some(e.to_string()),
                    error_kind: Some(kind),
                    provider_message_id: None,
                    attempted_at,
                }
            }
        }
    }

    async fn send_one(
        &self,
        recipient: &Recipient,
        body: &str,
    ) -> Result<crate::sms::SmsReceipt, SmsError> {
        let sender = self.sender.as_ref().ok_or(SmsError::NotConfigured)?;
        let phone = recipient
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(SmsError::MissingPhone)?;

        match tokio::time::timeout(self.timeout, sender.send(phone, body)).await {
            Ok(result) => result,
            Err(_) => Err(SmsError::Timeout(self.timeout)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use super::*;
    use crate::sms::SmsReceipt;

    /// Records every send; numbers listed in `reject` fail, `hang` never returns.
    #[derive(Default)]
    struct FakeSender {
        sent: Mutex<Vec<(String, String)>>,
        reject: Vec<String>,
        hang: Vec<String>,
    }

    #[async_trait]
    impl SmsSender for FakeSender {
        fn name(&self) -> &str {
            "fake"
        }

        async fn send(&self, to: &str, body: &str) -> Result<SmsReceipt, SmsError> {
            if self.hang.iter().any(|n| n == to) {
                std::future::pending::<()>().await;
            }
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), body.to_string()));
            if self.reject.iter().any(|n| n == to) {
                return Err(SmsError::Rejected {
                    status: 400,
                    message: "invalid number".to_string(),
                });
            }
            Ok(SmsReceipt {
                provider_message_id: Some(format!("SM-{to}")),
            })
        }
    }

    async fn attempt_all(dispatcher: &Dispatcher, recipients: &[Recipient]) -> Vec<DeliveryResult> {
        let mut results = Vec::new();
        for recipient in recipients {
            results.push(dispatcher.attempt(recipient, "alert body").await);
        }
        results
    }

    fn recipient(id: DbId, phone: Option<&str>) -> Recipient {
        Recipient {
            contact_type: ContactType::Caregiver,
            contact_id: id,
            name: format!("Contact {id}"),
            phone: phone.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn unconfigured_dispatcher_records_every_recipient() {
        let dispatcher = Dispatcher::new(None, DEFAULT_SEND_TIMEOUT);
        let results =
            attempt_all(&dispatcher, &[recipient(1, Some("+1555")), recipient(2, None)]).await;

        assert!(!dispatcher.is_configured());
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.success));
        assert!(results
            .iter()
            .all(|r| r.error_kind == Some(FailureKind::NotConfigured)));
    }

    #[tokio::test]
    async fn failed_attempt_reports_its_kind() {
        let fake = Arc::new(FakeSender {
            reject: vec!["+15550000002".to_string()],
            ..FakeSender::default()
        });
        let dispatcher = Dispatcher::new(Some(fake.clone()), DEFAULT_SEND_TIMEOUT);

        let results = attempt_all(
            &dispatcher,
            &[
                recipient(1, Some("+15550000001")),
                recipient(2, Some("+15550000002")),
                recipient(3, None),
                recipient(4, Some("+15550000004")),
            ],
        )
        .await;

        let ids: Vec<DbId> = results.iter().map(|r| r.contact_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);

        assert!(results[0].success);
        assert_eq!(
            results[0].provider_message_id.as_deref(),
            Some("SM-+15550000001")
        );
        assert_eq!(results[1].error_kind, Some(FailureKind::Rejected));
        assert_eq!(results[2].error_kind, Some(FailureKind::NoPhone));
        assert!(results[3].success);

        // The phone-less recipient never reached the provider.
        assert_eq!(fake.sent.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_send_times_out() {
        let fake = Arc::new(FakeSender {
            hang: vec!["+15550000001".to_string()],
            ..FakeSender::default()
        });
        let dispatcher = Dispatcher::new(Some(fake.clone()), Duration::from_secs(10));

        let results = attempt_all(
            &dispatcher,
            &[
                recipient(1, Some("+15550000001")),
                recipient(2, Some("+15550000002")),
            ],
        )
        .await;

        assert_eq!(results[0].error_kind, Some(FailureKind::Timeout));
        assert_matches!(results[0].error.as_deref(), Some(msg) if msg.contains("timed out"));
        assert!(results[1].success);
    }

    #[test]
    fn failure_kind_spelling() {
        assert_eq!(FailureKind::NoPhone.as_str(), "no_phone");
        assert_eq!(
            serde_json::to_value(FailureKind::NotConfigured).unwrap(),
            "not_configured"
        );
    }
}
