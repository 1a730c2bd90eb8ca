//! Contact eligibility rules for alert fan-out.
//!
//! The repositories express the same predicates in SQL; these functions are
//! the reference the resolver gates on and the tests pin down.

use crate::alert::{AlertCategory, AlertType};

/// Whether caregivers are consulted at all for an alert of this type.
pub fn caregivers_apply(alert_type: AlertType) -> bool {
    matches!(alert_type, AlertType::Emergency | AlertType::Critical)
}

/// Whether doctors are consulted at all for an alert in this category.
pub fn doctors_apply(category: AlertCategory) -> bool {
    matches!(category, AlertCategory::Glucose | AlertCategory::Medication)
}

/// A caregiver receives alerts only when flagged as an emergency contact
/// with alerts switched on.
pub fn caregiver_is_eligible(emergency_contact: bool, alerts_enabled: bool) -> bool {
    emergency_contact && alerts_enabled
}

/// A doctor receives alerts only once verified.
pub fn doctor_is_eligible(verified: bool) -> bool {
    verified
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caregivers_only_for_emergency_and_critical() {
        assert!(caregivers_apply(AlertType::Emergency));
        assert!(caregivers_apply(AlertType::Critical));
        assert!(!caregivers_apply(AlertType::Warning));
        assert!(!caregivers_apply(AlertType::Info));
    }

    #[test]
    fn doctors_only_for_glucose_and_medication() {
        assert!(doctors_apply(AlertCategory::Glucose));
        assert!(doctors_apply(AlertCategory::Medication));
        assert!(!doctors_apply(AlertCategory::Emergency));
        assert!(!doctors_apply(AlertCategory::System));
    }

    #[test]
    fn info_system_alert_reaches_nobody() {
        assert!(!caregivers_apply(AlertType::Info));
        assert!(!doctors_apply(AlertCategory::System));
    }

    #[test]
    fn caregiver_needs_both_flags() {
        assert!(caregiver_is_eligible(true, true));
        assert!(!caregiver_is_eligible(false, true));
        assert!(!caregiver_is_eligible(true, false));
        assert!(!caregiver_is_eligible(false, false));
    }

    #[test]
    fn doctor_needs_verification() {
        assert!(doctor_is_eligible(true));
        assert!(!doctor_is_eligible(false));
    }
}
