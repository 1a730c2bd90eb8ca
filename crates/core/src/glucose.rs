//! Glucose reading classification and automatic alert policy.
//!
//! Pure logic. The glucose handler records the reading, then asks
//! [`alert_level_for`] whether the value warrants an alert; the alert service
//! only ever sees the resulting `(type, category)` pair.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::alert::{AlertCategory, AlertType};
use crate::error::CoreError;

/* --------------------------------------------------------------------------
Thresholds (mg/dL)
-------------------------------------------------------------------------- */

/// Readings strictly below this are low.
pub const LOW_THRESHOLD: f64 = 70.0;

/// Readings strictly above this are high.
pub const HIGH_THRESHOLD: f64 = 140.0;

/// Readings strictly below this are critically low.
pub const CRITICAL_LOW_THRESHOLD: f64 = 54.0;

/// Readings strictly above this are critically high.
pub const CRITICAL_HIGH_THRESHOLD: f64 = 250.0;

/// Upper bound accepted on ingress.
pub const MAX_READING_VALUE: f64 = 1_000.0;

/// Maximum length for reading notes.
pub const MAX_NOTES_LENGTH: usize = 500;

/* --------------------------------------------------------------------------
Classification
-------------------------------------------------------------------------- */

/// Display status of a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GlucoseStatus {
    Low,
    Normal,
    High,
}

/// Classify a reading. 70 and 140 are both normal.
pub fn classify(value: f64) -> GlucoseStatus {
    if value < LOW_THRESHOLD {
        GlucoseStatus::Low
    } else if value > HIGH_THRESHOLD {
        GlucoseStatus::High
    } else {
        GlucoseStatus::Normal
    }
}

/// Alert severity a reading triggers, if any.
///
/// | Range              | Result   |
/// |--------------------|----------|
/// | `v < 54`           | critical |
/// | `54 <= v < 70`     | warning  |
/// | `140 < v <= 250`   | warning  |
/// | `v > 250`          | critical |
pub fn alert_level_for(value: f64) -> Option<AlertType> {
    if value < CRITICAL_LOW_THRESHOLD || value > CRITICAL_HIGH_THRESHOLD {
        Some(AlertType::Critical)
    } else if value < LOW_THRESHOLD || value > HIGH_THRESHOLD {
        Some(AlertType::Warning)
    } else {
        None
    }
}

/// The `(type, category)` pair for an alert-worthy reading.
pub fn alert_for(value: f64) -> Option<(AlertType, AlertCategory)> {
    alert_level_for(value).map(|t| (t, AlertCategory::Glucose))
}

/// Title and message for an automatically raised glucose alert.
pub fn alert_text_for(value: f64, alert_type: AlertType) -> (String, String) {
    let low = value < LOW_THRESHOLD;
    let severity = if alert_type == AlertType::Critical {
        "critically "
    } else {
        ""
    };
    let direction = if low { "low" } else { "high" };
    let title = if low {
        "Low glucose reading".to_string()
    } else {
        "High glucose reading".to_string()
    };
    let message = format!("Glucose reading of {value} mg/dL is {severity}{direction}");
    (title, message)
}

/* --------------------------------------------------------------------------
Ingress validation
-------------------------------------------------------------------------- */

/// When the reading was taken relative to meals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealContext {
    Fasting,
    BeforeMeal,
    AfterMeal,
    Bedtime,
    #[default]
    Random,
}

impl MealContext {
    pub fn as_str(self) -> &'static str {
        match self {
            MealContext::Fasting => "fasting",
            MealContext::BeforeMeal => "before_meal",
            MealContext::AfterMeal => "after_meal",
            MealContext::Bedtime => "bedtime",
            MealContext::Random => "random",
        }
    }
}

impl fmt::Display for MealContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealContext {
    type Err = CoreError;

    /// Accepts both `before_meal` and the `before-meal` spelling older
    /// clients send.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('-', "_").as_str() {
            "fasting" => Ok(MealContext::Fasting),
            "before_meal" => Ok(MealContext::BeforeMeal),
            "after_meal" => Ok(MealContext::AfterMeal),
            "bedtime" => Ok(MealContext::Bedtime),
            "random" | "" => Ok(MealContext::Random),
            other => Err(CoreError::Validation(format!(
                "Invalid meal context '{other}'. Must be one of: fasting, before_meal, \
                 after_meal, bedtime, random"
            ))),
        }
    }
}

/// Validate a reading value and its notes.
pub fn validate_reading(value: f64, notes: Option<&str>) -> Result<(), CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(
            "Glucose value must be positive".to_string(),
        ));
    }
    if value > MAX_READING_VALUE {
        return Err(CoreError::Validation(
            "Glucose value seems too high, please check".to_string(),
        ));
    }
    if let Some(n) = notes {
        if n.chars().count() > MAX_NOTES_LENGTH {
            return Err(CoreError::Validation(format!(
                "Notes exceed maximum length of {MAX_NOTES_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
