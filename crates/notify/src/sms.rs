//! SMS delivery through Twilio's REST API.
//!
//! [`SmsConfig::from_env`] returns `None` when the Twilio credentials are not
//! all present; the dispatcher then records every send as not configured
//! instead of attempting it.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for a single SMS send.
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    /// No provider credentials are configured.
    #[error("SMS provider not configured")]
    NotConfigured,

    /// The recipient has no phone number on file.
    #[error("Recipient has no phone number")]
    MissingPhone,

    /// The provider answered with a non-2xx status.
    #[error("SMS provider returned HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The HTTP request itself failed (DNS, TLS, connection reset, etc.).
    #[error("SMS request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The send did not complete within the configured bound.
    #[error("SMS send timed out after {0:?}")]
    Timeout(Duration),
}

// ---------------------------------------------------------------------------
// Sender trait
// ---------------------------------------------------------------------------

/// Provider acknowledgement for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsReceipt {
    /// Provider-assigned message id (Twilio `sid`).
    pub provider_message_id: Option<String>,
}

/// A service that can deliver one text message.
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn send(&self, to: &str, body: &str) -> Result<SmsReceipt, SmsError>;
}

// ---------------------------------------------------------------------------
// SmsConfig
// ---------------------------------------------------------------------------

/// Default Twilio API base URL.
const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// Twilio credentials and sender number.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// E.164 number messages are sent from.
    pub from_number: String,
    /// Base URL, overridable for staging.
    pub api_base: String,
}

impl SmsConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` unless all three credentials are set and non-empty.
    ///
    /// | Variable              | Required | Default                  |
    /// |-----------------------|----------|--------------------------|
    /// | `TWILIO_ACCOUNT_SID`  | yes      |                          |
    /// | `TWILIO_AUTH_TOKEN`   | yes      |                          |
    /// | `TWILIO_PHONE_NUMBER` | yes      |                          |
    /// | `TWILIO_API_BASE`     | no       | `https://api.twilio.com` |
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Some(Self {
            account_sid: var("TWILIO_ACCOUNT_SID")?,
            auth_token: var("TWILIO_AUTH_TOKEN")?,
            from_number: var("TWILIO_PHONE_NUMBER")?,
            api_base: var("TWILIO_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            self.account_sid
        )
    }
}

// ---------------------------------------------------------------------------
// TwilioSms
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResource {
    message: Option<String>,
}

/// Sends messages through the Twilio Messages API.
pub struct TwilioSms {
    config: SmsConfig,
    client: reqwest::Client,
}

impl TwilioSms {
    /// Build a sender whose HTTP client gives up after `timeout`.
    pub fn new(config: SmsConfig, timeout: Duration) -> Result<Self, SmsError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl SmsSender for TwilioSms {
    fn name(&self) -> &str {
        "twilio"
    }

    async fn send(&self, to: &str, body: &str) -> Result<SmsReceipt, SmsError> {
        let response = self
            .client
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", to),
                ("From", self.config.from_number.as_str()),
                ("Body", body),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResource>()
                .await
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(SmsError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let resource = response.json::<MessageResource>().await?;
        Ok(SmsReceipt {
            provider_message_id: resource.sid,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SmsConfig {
        SmsConfig {
            account_sid: "AC123".to_string(),
            auth_token: "secret".to_string(),
            from_number: "+15550000000".to_string(),
            api_base: "https://api.twilio.com/".to_string(),
        }
    }

    #[test]
    fn messages_url_uses_account_sid() {
        assert_eq!(
            config().messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn new_builds_client() {
        assert!(TwilioSms::new(config(), Duration::from_secs(10)).is_ok());
    }

    #[test]
    fn error_display() {
        let err = SmsError::Rejected {
            status: 400,
            message: "Invalid 'To' Phone Number".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "SMS provider returned HTTP 400: Invalid 'To' Phone Number"
        );
        assert_eq!(
            SmsError::NotConfigured.to_string(),
            "SMS provider not configured"
        );
    }
}
