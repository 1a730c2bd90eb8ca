//! SMS body composition.

use glucotrack_core::alert::{AlertData, AlertType};

/// Build the text sent to every recipient of an alert.
///
/// `patient` is the account holder's name; a blank name reads as "user".
///
/// ```text
/// EMERGENCY ALERT for Jordan Lee:
/// Type: critical
/// Message: Glucose reading of 48 mg/dL is critically low
/// Location: https://maps.google.com/?q=40.7,-74
/// ```
pub fn compose_alert_sms(
    alert_type: AlertType,
    patient: &str,
    message: &str,
    data: &AlertData,
) -> String {
    let patient = match patient.trim() {
        "" => "user",
        name => name,
    };
    format!(
        "EMERGENCY ALERT for {}:\nType: {}\nMessage: {}\n{}",
        patient,
        alert_type,
        message,
        data.location_text()
    )
}
