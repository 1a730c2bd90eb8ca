//! Caregiver contact models and DTOs.

use glucotrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// Which kinds of events a caregiver has asked to hear about.
///
/// Missing keys take their default; camelCase keys are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertPreferences {
    #[serde(alias = "lowGlucose")]
    pub low_glucose: bool,
    #[serde(alias = "highGlucose")]
    pub high_glucose: bool,
    #[serde(alias = "missedMedication")]
    pub missed_medication: bool,
    #[serde(alias = "emergencyOnly")]
    pub emergency_only: bool,
}

impl Default for AlertPreferences {
    fn default() -> Self {
        Self {
            low_glucose: true,
            high_glucose: true,
            missed_medication: true,
            emergency_only: false,
        }
    }
}

/// A row from the `caregivers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Caregiver {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub relationship: String,
    pub email: String,
    pub phone: String,
    pub emergency_contact: bool,
    pub alerts_enabled: bool,
    pub alert_preferences: Json<AlertPreferences>,
    pub access_level: String,
    pub invite_status: String,
    #[serde(skip_serializing)]
    pub invite_token: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a caregiver.
///
/// Flags accept both snake_case and camelCase keys; a misspelled flag must
/// not silently leave a contact out of alerts.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCaregiver {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    pub relationship: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub phone: String,
    #[serde(default, alias = "emergencyContact")]
    pub emergency_contact: bool,
    #[serde(default = "default_true", alias = "alertsEnabled")]
    pub alerts_enabled: bool,
    #[serde(default, alias = "alertPreferences")]
    pub alert_preferences: Option<AlertPreferences>,
    #[serde(default, alias = "accessLevel")]
    pub access_level: Option<String>,
}

fn default_true() -> bool {
    true
}
