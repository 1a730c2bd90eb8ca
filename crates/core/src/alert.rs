//! Alert vocabulary, priority, lifecycle, and payload types.
//!
//! Alerts are persisted by the DB layer as plain text columns; the enums here
//! are the canonical spelling of those values and the only place they are
//! parsed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Maximum length for an alert title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for an alert message.
pub const MAX_MESSAGE_LENGTH: usize = 2_000;

/// Priority assigned to alerts that are neither emergency nor critical.
pub const DEFAULT_PRIORITY: i16 = 3;

/* --------------------------------------------------------------------------
Enums
-------------------------------------------------------------------------- */

/// Severity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Emergency,
    Critical,
    Warning,
    Info,
}

impl AlertType {
    pub const ALL: [AlertType; 4] = [
        AlertType::Emergency,
        AlertType::Critical,
        AlertType::Warning,
        AlertType::Info,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AlertType::Emergency => "emergency",
            AlertType::Critical => "critical",
            AlertType::Warning => "warning",
            AlertType::Info => "info",
        }
    }
}

/// Subject area of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    Glucose,
    Medication,
    Emergency,
    System,
}

impl AlertCategory {
    pub const ALL: [AlertCategory; 4] = [
        AlertCategory::Glucose,
        AlertCategory::Medication,
        AlertCategory::Emergency,
        AlertCategory::System,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AlertCategory::Glucose => "glucose",
            AlertCategory::Medication => "medication",
            AlertCategory::Emergency => "emergency",
            AlertCategory::System => "system",
        }
    }
}

/// Kind of third party an alert was sent to.
///
/// Caregivers and doctors live in separate tables; a recipient is always
/// identified by the pair `(contact_type, contact_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactType {
    Caregiver,
    Doctor,
    EmergencyServices,
}

impl ContactType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactType::Caregiver => "caregiver",
            ContactType::Doctor => "doctor",
            ContactType::EmergencyServices => "emergency_services",
        }
    }
}

/// Lifecycle state of an alert record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    /// Persisted, no dispatch attempted yet.
    Created,
    /// The dispatcher ran, regardless of how many sends succeeded.
    DispatchAttempted,
    /// Closed by an acknowledgement or by the owner. Terminal.
    Resolved,
}

impl AlertStatus {
    pub const ALL: [AlertStatus; 3] = [
        AlertStatus::Created,
        AlertStatus::DispatchAttempted,
        AlertStatus::Resolved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AlertStatus::Created => "created",
            AlertStatus::DispatchAttempted => "dispatch_attempted",
            AlertStatus::Resolved => "resolved",
        }
    }

    /// Whether moving from `self` to `next` is a legal lifecycle step.
    pub fn can_transition_to(self, next: AlertStatus) -> bool {
        matches!(
            (self, next),
            (AlertStatus::Created, AlertStatus::DispatchAttempted)
                | (AlertStatus::Created, AlertStatus::Resolved)
                | (AlertStatus::DispatchAttempted, AlertStatus::Resolved)
        )
    }

    /// States from which `self` can be entered, as stored strings.
    ///
    /// Repositories guard their status updates with these so the database
    /// enforces the same lifecycle as [`AlertStatus::can_transition_to`].
    pub fn predecessors(self) -> Vec<&'static str> {
        Self::ALL
            .into_iter()
            .filter(|from| from.can_transition_to(self))
            .map(AlertStatus::as_str)
            .collect()
    }
}

macro_rules! impl_text_enum {
    ($ty:ident, $label:literal, [$($variant:ident),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s == $ty::$variant.as_str() {
                        return Ok($ty::$variant);
                    }
                )+
                let valid: Vec<&str> = vec![$($ty::$variant.as_str()),+];
                Err(CoreError::Validation(format!(
                    "Invalid {} '{s}'. Must be one of: {}",
                    $label,
                    valid.join(", ")
                )))
            }
        }
    };
}

impl_text_enum!(AlertType, "alert type", [Emergency, Critical, Warning, Info]);
impl_text_enum!(
    AlertCategory,
    "alert category",
    [Glucose, Medication, Emergency, System]
);
impl_text_enum!(
    ContactType,
    "contact type",
    [Caregiver, Doctor, EmergencyServices]
);
impl_text_enum!(
    AlertStatus,
    "alert status",
    [Created, DispatchAttempted, Resolved]
);

/* --------------------------------------------------------------------------
Priority and validation
-------------------------------------------------------------------------- */

/// Priority (1-5) derived from the alert type.
pub fn priority_for(alert_type: AlertType) -> i16 {
    match alert_type {
        AlertType::Emergency => 5,
        AlertType::Critical => 4,
        AlertType::Warning | AlertType::Info => DEFAULT_PRIORITY,
    }
}

/// Validate the free-text fields of a new alert.
pub fn validate_alert_text(title: &str, message: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() || message.trim().is_empty() {
        return Err(CoreError::Validation("Missing required fields".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Alert title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Alert message exceeds maximum length of {MAX_MESSAGE_LENGTH} characters"
        )));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Payload
-------------------------------------------------------------------------- */

/// Where the user was when the alert was raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertLocation {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng")]
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Free-form context attached to an alert.
///
/// The well-known keys are typed; anything else the client sends is kept in
/// `extra` and stored verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glucose_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medication_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<AlertLocation>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AlertData {
    /// Human-readable location line for outbound messages.
    pub fn location_text(&self) -> String {
        match &self.location {
            Some(loc) if loc.latitude.is_finite() && loc.longitude.is_finite() => format!(
                "Location: https://maps.google.com/?q={},{}",
                loc.latitude, loc.longitude
            ),
            _ => "Location not available".to_string(),
        }
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
