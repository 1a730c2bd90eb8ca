//! Medication model and DTOs.

use glucotrack_core::dose::{Dose, DoseInput};
use glucotrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

pub const VALID_MEDICATION_TYPES: &[&str] = &[
    "insulin",
    "metformin",
    "sulfonylurea",
    "dpp4_inhibitor",
    "sglt2_inhibitor",
    "glp1_agonist",
    "other",
];

/// A row from the `medications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Medication {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub medication_type: String,
    pub dose: Json<Dose>,
    pub times_per_day: i16,
    pub instructions: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Raw request body; `dosage` may be a number, an object, or text.
///
/// Used for both create and update. `is_active` is only honoured on update.
#[derive(Debug, Clone, Deserialize)]
pub struct MedicationInput {
    pub name: String,
    #[serde(default, alias = "medicationType")]
    pub medication_type: Option<String>,
    #[serde(alias = "dose")]
    pub dosage: DoseInput,
    #[serde(default, alias = "timesPerDay")]
    pub times_per_day: Option<i16>,
    pub instructions: Option<String>,
    #[serde(default, alias = "isActive")]
    pub is_active: Option<bool>,
}

/// Validated input with the dose already normalized.
#[derive(Debug, Clone)]
pub struct CreateMedication {
    pub name: String,
    pub medication_type: String,
    pub dose: Dose,
    pub times_per_day: i16,
    pub instructions: Option<String>,
}
