//! Alert and alert-recipient models and DTOs.

use glucotrack_core::alert::{AlertCategory, AlertData, AlertStatus, AlertType, ContactType};
use glucotrack_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `alerts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Alert {
    pub id: DbId,
    pub user_id: DbId,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub category: String,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
    pub status: String,
    pub resolved: bool,
    pub resolved_at: Option<Timestamp>,
    pub priority: i16,
    pub dispatched_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Alert {
    /// Parsed lifecycle state. Unknown values (which the CHECK constraint
    /// rules out) read as `Created`.
    pub fn lifecycle(&self) -> AlertStatus {
        self.status.parse().unwrap_or(AlertStatus::Created)
    }
}

/// A row from the `alert_recipients` table: one dispatch attempt.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlertRecipient {
    pub id: DbId,
    pub alert_id: DbId,
    pub contact_type: String,
    pub contact_id: DbId,
    pub to_name: String,
    pub to_phone: Option<String>,
    pub sent_at: Timestamp,
    pub delivered: bool,
    pub error: Option<String>,
    pub error_kind: Option<String>,
    pub provider_message_id: Option<String>,
    pub acknowledged: bool,
    pub acknowledged_at: Option<Timestamp>,
}

/// An alert together with its `sent_to` list.
#[derive(Debug, Clone, Serialize)]
pub struct AlertWithRecipients {
    #[serde(flatten)]
    pub alert: Alert,
    pub sent_to: Vec<AlertRecipient>,
}

/// Validated input for inserting a new alert.
#[derive(Debug, Clone)]
pub struct CreateAlert {
    pub alert_type: AlertType,
    pub category: AlertCategory,
    pub title: String,
    pub message: String,
    pub data: AlertData,
    pub priority: i16,
}

/// One dispatch attempt to be appended to an alert's recipient list.
#[derive(Debug, Clone)]
pub struct NewAlertRecipient {
    pub contact_type: ContactType,
    pub contact_id: DbId,
    pub to_name: String,
    pub to_phone: Option<String>,
    pub sent_at: Timestamp,
    pub delivered: bool,
    pub error: Option<String>,
    pub error_kind: Option<String>,
    pub provider_message_id: Option<String>,
}

/// Filters for listing a user's alerts.
#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    pub alert_type: Option<AlertType>,
    pub resolved: Option<bool>,
    pub limit: i64,
}
