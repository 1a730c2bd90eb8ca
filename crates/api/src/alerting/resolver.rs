//! Contact Resolver: which caregivers and doctors an alert reaches.

use glucotrack_core::alert::{AlertCategory, AlertType, ContactType};
use glucotrack_core::eligibility::{
    caregiver_is_eligible, caregivers_apply, doctor_is_eligible, doctors_apply,
};
use glucotrack_core::types::DbId;
use glucotrack_db::repositories::{CaregiverRepo, DoctorRepo};
use glucotrack_db::DbPool;
use glucotrack_notify::Recipient;

/// Resolve the recipients for an alert of `alert_type` / `category` owned by
/// `user_id`.
///
/// Emergency and critical alerts reach caregivers marked as emergency
/// contacts with alerts enabled; glucose and medication alerts reach
/// verified doctors. The two sets are concatenated, caregivers first. An
/// empty result is not an error.
pub async fn resolve_contacts(
    pool: &DbPool,
    user_id: DbId,
    alert_type: AlertType,
    category: AlertCategory,
) -> Result<Vec<Recipient>, sqlx::Error> {
    let mut recipients = Vec::new();

    if caregivers_apply(alert_type) {
        let caregivers = CaregiverRepo::list_alert_eligible(pool, user_id).await?;
        recipients.extend(
            caregivers
                .into_iter()
                .filter(|c| caregiver_is_eligible(c.emergency_contact, c.alerts_enabled))
                .map(|c| Recipient {
                    contact_type: ContactType::Caregiver,
                    contact_id: c.id,
                    name: c.name,
                    phone: Some(c.phone),
                }),
        );
    }

    if doctors_apply(category) {
        let doctors = DoctorRepo::list_verified(pool, user_id).await?;
        recipients.extend(
            doctors
                .into_iter()
                .filter(|d| doctor_is_eligible(d.verified))
                .map(|d| Recipient {
                    contact_type: ContactType::Doctor,
                    contact_id: d.id,
                    name: d.name,
                    phone: Some(d.phone),
                }),
        );
    }

    tracing::debug!(
        user_id,
        alert_type = %alert_type,
        category = %category,
        recipients = recipients.len(),
        "Resolved alert contacts"
    );
    Ok(recipients)
}
