//! Doctor contact models and DTOs.

use glucotrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `doctors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Doctor {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub specialty: String,
    pub hospital: String,
    pub email: String,
    pub phone: String,
    pub license_number: Option<String>,
    pub verified: bool,
    pub report_sharing: bool,
    pub report_frequency: String,
    pub next_appointment: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a doctor.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDoctor {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    pub specialty: String,
    #[validate(length(min = 1, max = 200, message = "Hospital is required"))]
    pub hospital: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub phone: String,
    #[serde(default, alias = "licenseNumber")]
    pub license_number: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, alias = "reportSharing")]
    pub report_sharing: Option<bool>,
    #[serde(default, alias = "reportFrequency")]
    pub report_frequency: Option<String>,
    #[serde(default, alias = "nextAppointment")]
    pub next_appointment: Option<Timestamp>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}
