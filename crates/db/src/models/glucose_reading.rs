//! Glucose reading model and DTO.

use glucotrack_core::glucose::MealContext;
use glucotrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `glucose_readings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GlucoseReading {
    pub id: DbId,
    pub user_id: DbId,
    pub value: f64,
    pub unit: String,
    pub meal_context: String,
    pub notes: Option<String>,
    pub recorded_at: Timestamp,
    pub created_at: Timestamp,
}

/// Validated input for inserting a reading.
#[derive(Debug, Clone)]
pub struct CreateGlucoseReading {
    pub value: f64,
    pub meal_context: MealContext,
    pub notes: Option<String>,
    pub recorded_at: Option<Timestamp>,
}

/// Raw request body for recording a reading.
#[derive(Debug, Clone, Deserialize)]
pub struct GlucoseReadingInput {
    pub value: f64,
    pub meal_context: Option<String>,
    pub notes: Option<String>,
    pub timestamp: Option<Timestamp>,
}

/// Aggregates over a user's readings in a time window.
#[derive(Debug, Clone, Default, FromRow)]
pub struct GlucoseStats {
    pub total_readings: i64,
    /// `None` when there are no readings.
    pub avg_glucose: Option<f64>,
    pub in_range: i64,
    pub low_readings: i64,
    pub high_readings: i64,
}
