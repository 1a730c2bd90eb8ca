//! Caregiver and doctor contact vocabulary and validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Maximum length for a contact's display name.
pub const MAX_NAME_LENGTH: usize = 100;

pub const VALID_RELATIONSHIPS: &[&str] =
    &["spouse", "parent", "child", "sibling", "friend", "other"];

pub const VALID_ACCESS_LEVELS: &[&str] = &["view_only", "limited", "full"];

pub const DEFAULT_ACCESS_LEVEL: &str = "limited";

pub const VALID_SPECIALTIES: &[&str] = &[
    "endocrinologist",
    "primary_care",
    "nutritionist",
    "cardiologist",
    "ophthalmologist",
    "podiatrist",
    "other",
];

pub const VALID_REPORT_FREQUENCIES: &[&str] = &["weekly", "monthly", "quarterly", "as_needed"];

pub const DEFAULT_REPORT_FREQUENCY: &str = "monthly";

/// Digits with an optional leading `+` once separators are stripped.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("valid phone regex"));

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

fn validate_one_of(value: &str, valid: &[&str], label: &str) -> Result<(), CoreError> {
    if valid.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {label} '{value}'. Must be one of: {}",
            valid.join(", ")
        )))
    }
}

pub fn validate_relationship(value: &str) -> Result<(), CoreError> {
    validate_one_of(value, VALID_RELATIONSHIPS, "relationship")
}

pub fn validate_access_level(value: &str) -> Result<(), CoreError> {
    validate_one_of(value, VALID_ACCESS_LEVELS, "access level")
}

pub fn validate_specialty(value: &str) -> Result<(), CoreError> {
    validate_one_of(value, VALID_SPECIALTIES, "specialty")
}

pub fn validate_report_frequency(value: &str) -> Result<(), CoreError> {
    validate_one_of(value, VALID_REPORT_FREQUENCIES, "report frequency")
}

/// Strip spaces, dashes, dots, and parentheses from a phone number.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect()
}

/// Normalize and validate a phone number, returning the normalized form.
pub fn validate_phone(raw: &str) -> Result<String, CoreError> {
    let normalized = normalize_phone(raw.trim());
    if PHONE_RE.is_match(&normalized) {
        Ok(normalized)
    } else {
        Err(CoreError::Validation(format!(
            "Invalid phone number '{raw}'"
        )))
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
