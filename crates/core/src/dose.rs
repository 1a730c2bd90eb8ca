//! Medication dose normalization.
//!
//! Clients send a dose as a bare number, as `{ "amount": .., "unit": .. }`, or
//! as free text. [`DoseInput`] accepts all three shapes and
//! [`DoseInput::normalize`] turns them into one [`Dose`] that the rest of the
//! system stores and renders without re-checking the shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Unit assumed for a bare numeric dose.
pub const DEFAULT_UNIT: DoseUnit = DoseUnit::Units;

/// Maximum length of a free-text dose.
pub const MAX_FREEFORM_LENGTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoseUnit {
    Mg,
    Units,
    Ml,
    Tablets,
}

impl DoseUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            DoseUnit::Mg => "mg",
            DoseUnit::Units => "units",
            DoseUnit::Ml => "ml",
            DoseUnit::Tablets => "tablets",
        }
    }
}

/// Canonical dose, stored as tagged JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dose {
    Measured { amount: f64, unit: DoseUnit },
    Freeform { text: String },
}

impl fmt::Display for Dose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dose::Measured { amount, unit } => write!(f, "{amount} {}", unit.as_str()),
            Dose::Freeform { text } => f.write_str(text),
        }
    }
}

/// Any dose shape accepted on ingress.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DoseInput {
    Amount(f64),
    Structured {
        amount: f64,
        #[serde(default)]
        unit: Option<DoseUnit>,
    },
    Text(String),
}

impl DoseInput {
    /// Validate and convert into the canonical [`Dose`].
    pub fn normalize(self) -> Result<Dose, CoreError> {
        match self {
            DoseInput::Amount(amount) => measured(amount, DEFAULT_UNIT),
            DoseInput::Structured { amount, unit } => {
                measured(amount, unit.unwrap_or(DEFAULT_UNIT))
            }
            DoseInput::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(CoreError::Validation("Dosage is required".to_string()));
                }
                if text.chars().count() > MAX_FREEFORM_LENGTH {
                    return Err(CoreError::Validation(format!(
                        "Dosage text exceeds maximum length of {MAX_FREEFORM_LENGTH} characters"
                    )));
                }
                Ok(Dose::Freeform {
                    text: text.to_string(),
                })
            }
        }
    }
}

fn measured(amount: f64, unit: DoseUnit) -> Result<Dose, CoreError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CoreError::Validation(
            "Dosage amount must be a positive number".to_string(),
        ));
    }
    Ok(Dose::Measured { amount, unit })
}
