//! Alert creation, listing, acknowledgement, and resolution.

use std::collections::HashMap;

use glucotrack_core::alert::{
    priority_for, validate_alert_text, AlertCategory, AlertData, AlertStatus, AlertType,
};
use glucotrack_core::eligibility::{caregivers_apply, doctors_apply};
use glucotrack_core::error::CoreError;
use glucotrack_core::types::DbId;
use glucotrack_db::clamp_limit;
use glucotrack_db::models::alert::{
    Alert, AlertFilter, AlertRecipient, AlertWithRecipients, CreateAlert, NewAlertRecipient,
};
use glucotrack_db::repositories::AlertRepo;
use glucotrack_notify::{compose_alert_sms, DeliveryResult, FailureKind, Recipient};
use serde::{Deserialize, Serialize};

use crate::alerting::resolver::resolve_contacts;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Default page size for alert listings.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Largest page size a client may request.
pub const MAX_LIST_LIMIT: i64 = 200;

const NOTICE_NO_CONTACTS: &str =
    "No emergency contacts configured. Add a caregiver or doctor to receive alerts.";
const NOTICE_NOT_CONFIGURED: &str =
    "SMS provider not configured. The alert was saved but no messages were sent.";
const NOTICE_PARTIAL: &str = "Some notifications could not be delivered.";

/* --------------------------------------------------------------------------
Request types
-------------------------------------------------------------------------- */

/// Raw body of `POST /api/alerts`.
///
/// Fields are optional at the serde level so that a missing field yields a
/// 400 with a JSON body rather than a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAlertRequest {
    #[serde(rename = "type")]
    pub alert_type: Option<String>,
    pub category: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<AlertData>,
    #[serde(default, alias = "sendToContacts")]
    pub send_to_contacts: Option<bool>,
}

/// A validated alert ready to be stored and dispatched.
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub alert_type: AlertType,
    pub category: AlertCategory,
    pub title: String,
    pub message: String,
    pub data: AlertData,
    pub send_to_contacts: bool,
}

impl TryFrom<CreateAlertRequest> for NewAlert {
    type Error = CoreError;

    fn try_from(req: CreateAlertRequest) -> Result<Self, Self::Error> {
        let missing = || CoreError::Validation("Missing required fields".to_string());
        let alert_type = req.alert_type.filter(|s| !s.trim().is_empty()).ok_or_else(missing)?;
        let category = req.category.filter(|s| !s.trim().is_empty()).ok_or_else(missing)?;
        let title = req.title.ok_or_else(missing)?;
        let message = req.message.ok_or_else(missing)?;

        validate_alert_text(&title, &message)?;

        Ok(NewAlert {
            alert_type: alert_type.trim().parse()?,
            category: category.trim().parse()?,
            title: title.trim().to_string(),
            message: message.trim().to_string(),
            data: req.data.unwrap_or_default(),
            send_to_contacts: req.send_to_contacts.unwrap_or(true),
        })
    }
}

/* --------------------------------------------------------------------------
Response types
-------------------------------------------------------------------------- */

/// How the dispatch went, for the client to explain to the user.
#[derive(Debug, Clone, Serialize)]
pub struct DeliverySummary {
    pub sms_configured: bool,
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl DeliverySummary {
    /// `contacts_apply` says whether the alert's type or category routes to
    /// any contact at all; info/system alerts never do.
    fn from_results(sms_configured: bool, contacts_apply: bool, results: &[DeliveryResult]) -> Self {
        let delivered = results.iter().filter(|r| r.success).count();
        let failed = results.len() - delivered;
        let notice = if results.is_empty() {
            contacts_apply.then_some(NOTICE_NO_CONTACTS)
        } else if results
            .iter()
            .all(|r| r.error_kind == Some(FailureKind::NotConfigured))
        {
            Some(NOTICE_NOT_CONFIGURED)
        } else if failed > 0 {
            Some(NOTICE_PARTIAL)
        } else {
            None
        };

        Self {
            sms_configured,
            attempted: results.len(),
            delivered,
            failed,
            notice: notice.map(str::to_string),
        }
    }

    fn skipped(sms_configured: bool) -> Self {
        Self {
            sms_configured,
            attempted: 0,
            delivered: 0,
            failed: 0,
            notice: None,
        }
    }
}

/// Outcome of [`create_alert`].
#[derive(Debug, Clone, Serialize)]
pub struct CreatedAlert {
    pub alert: AlertWithRecipients,
    pub delivery: DeliverySummary,
}

/* --------------------------------------------------------------------------
Operations
-------------------------------------------------------------------------- */

/// Store a new alert and, unless disabled, notify its eligible contacts.
///
/// The alert is inserted as `created`. When `send_to_contacts` is set the
/// resolver and dispatcher run before the response and each attempt is
/// recorded as soon as it finishes, then the alert moves to
/// `dispatch_attempted`. Delivery failures are reported in the summary and
/// never fail the call.
pub async fn create_alert(
    state: &AppState,
    user: &AuthUser,
    new: NewAlert,
) -> AppResult<CreatedAlert> {
    let user_id = user.user_id;
    let input = CreateAlert {
        alert_type: new.alert_type,
        category: new.category,
        title: new.title,
        message: new.message,
        data: new.data,
        priority: priority_for(new.alert_type),
    };
    let alert = AlertRepo::create(&state.pool, user_id, &input).await?;

    tracing::info!(
        user_id,
        alert_id = alert.id,
        alert_type = %input.alert_type,
        category = %input.category,
        priority = alert.priority,
        "Alert created"
    );

    let sms_configured = state.dispatcher.is_configured();

    if !new.send_to_contacts {
        return Ok(CreatedAlert {
            alert: AlertWithRecipients {
                alert,
                sent_to: Vec::new(),
            },
            delivery: DeliverySummary::skipped(sms_configured),
        });
    }

    let contacts_apply = caregivers_apply(input.alert_type) || doctors_apply(input.category);
    let recipients =
        resolve_contacts(&state.pool, user_id, input.alert_type, input.category).await?;
    let body = compose_alert_sms(
        input.alert_type,
        &user.full_name,
        &input.message,
        &input.data,
    );

    // Detached so that a dropped request cannot stop the fan-out between a
    // send and its recipient row.
    let (alert, results, sent_to) =
        tokio::spawn(fan_out(state.clone(), alert, recipients, body))
            .await
            .map_err(|e| AppError::InternalError(format!("Alert fan-out task failed: {e}")))??;

    let delivery = DeliverySummary::from_results(sms_configured, contacts_apply, &results);
    tracing::info!(
        user_id,
        alert_id = alert.id,
        status = %alert.lifecycle(),
        recipients = delivery.attempted,
        delivered = delivery.delivered,
        failed = delivery.failed,
        "Alert dispatch recorded"
    );

    Ok(CreatedAlert {
        alert: AlertWithRecipients { alert, sent_to },
        delivery,
    })
}

/// Send to each recipient in order, appending its row after every attempt,
/// then advance the alert out of `created`.
async fn fan_out(
    state: AppState,
    alert: Alert,
    recipients: Vec<Recipient>,
    body: String,
) -> AppResult<(Alert, Vec<DeliveryResult>, Vec<AlertRecipient>)> {
    let mut results = Vec::with_capacity(recipients.len());
    let mut sent_to = Vec::with_capacity(recipients.len());

    for recipient in &recipients {
        let result = state.dispatcher.attempt(recipient, &body).await;
        let row = AlertRepo::append_recipient(&state.pool, alert.id, &to_recipient_row(&result))
            .await?;
        results.push(result);
        sent_to.push(row);
    }

    let alert = if alert.lifecycle().can_transition_to(AlertStatus::DispatchAttempted) {
        match AlertRepo::mark_dispatched(&state.pool, alert.id).await? {
            Some(dispatched) => dispatched,
            // Resolved while the messages were going out; keep its state.
            None => find_owned(&state, alert.user_id, alert.id).await?,
        }
    } else {
        alert
    };

    Ok((alert, results, sent_to))
}

fn to_recipient_row(result: &DeliveryResult) -> NewAlertRecipient {
    NewAlertRecipient {
        contact_type: result.contact_type,
        contact_id: result.contact_id,
        to_name: result.to_name.clone(),
        to_phone: result.to_phone.clone(),
        sent_at: result.attempted_at,
        delivered: result.success,
        error: result.error.clone(),
        error_kind: result.error_kind.map(|k| k.as_str().to_string()),
        provider_message_id: result.provider_message_id.clone(),
    }
}

/// A user's alerts, newest first, each with its recipient list.
pub async fn list_alerts(
    state: &AppState,
    user_id: DbId,
    alert_type: Option<AlertType>,
    resolved: Option<bool>,
    limit: Option<i64>,
) -> AppResult<Vec<AlertWithRecipients>> {
    let filter = AlertFilter {
        alert_type,
        resolved,
        limit: clamp_limit(limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
    };
    let alerts = AlertRepo::list_for_user(&state.pool, user_id, &filter).await?;

    let ids: Vec<DbId> = alerts.iter().map(|a| a.id).collect();
    let mut by_alert: HashMap<DbId, Vec<_>> = HashMap::new();
    for recipient in AlertRepo::list_recipients_for_alerts(&state.pool, &ids).await? {
        by_alert.entry(recipient.alert_id).or_default().push(recipient);
    }

    Ok(alerts
        .into_iter()
        .map(|alert| {
            let sent_to = by_alert.remove(&alert.id).unwrap_or_default();
            AlertWithRecipients { alert, sent_to }
        })
        .collect())
}

/// One alert owned by `user_id`, with its recipient list.
pub async fn get_alert(
    state: &AppState,
    user_id: DbId,
    alert_id: DbId,
) -> AppResult<AlertWithRecipients> {
    let alert = find_owned(state, user_id, alert_id).await?;
    let sent_to = AlertRepo::list_recipients(&state.pool, alert.id).await?;
    Ok(AlertWithRecipients { alert, sent_to })
}

/// Record that one recipient acknowledged the alert, resolving it if open.
pub async fn acknowledge(
    state: &AppState,
    user_id: DbId,
    alert_id: DbId,
    recipient_id: DbId,
) -> AppResult<AlertWithRecipients> {
    let alert = find_owned(state, user_id, alert_id).await?;

    AlertRepo::acknowledge_recipient(&state.pool, alert.id, recipient_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AlertRecipient",
            id: recipient_id,
        }))?;

    let alert = if alert.lifecycle().can_transition_to(AlertStatus::Resolved) {
        match AlertRepo::resolve(&state.pool, alert.id, user_id).await? {
            Some(resolved) => resolved,
            // Resolved concurrently; re-read the current row.
            None => find_owned(state, user_id, alert_id).await?,
        }
    } else {
        alert
    };

    tracing::info!(user_id, alert_id, recipient_id, "Alert acknowledged");

    let sent_to = AlertRepo::list_recipients(&state.pool, alert.id).await?;
    Ok(AlertWithRecipients { alert, sent_to })
}

/// Close an open alert on behalf of its owner.
pub async fn resolve(
    state: &AppState,
    user_id: DbId,
    alert_id: DbId,
) -> AppResult<AlertWithRecipients> {
    let current = find_owned(state, user_id, alert_id).await?;
    let already_resolved =
        || AppError::Core(CoreError::Conflict("Alert is already resolved".to_string()));

    if !current.lifecycle().can_transition_to(AlertStatus::Resolved) {
        return Err(already_resolved());
    }

    let alert = AlertRepo::resolve(&state.pool, alert_id, user_id)
        .await?
        .ok_or_else(already_resolved)?;

    tracing::info!(user_id, alert_id, "Alert resolved");

    let sent_to = AlertRepo::list_recipients(&state.pool, alert.id).await?;
    Ok(AlertWithRecipients { alert, sent_to })
}

async fn find_owned(state: &AppState, user_id: DbId, alert_id: DbId) -> AppResult<Alert> {
    AlertRepo::find_for_user(&state.pool, alert_id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Alert",
            id: alert_id,
        }))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;
    use glucotrack_core::alert::ContactType;

    use super::*;

    fn request(value: serde_json::Value) -> CreateAlertRequest {
        serde_json::from_value(value).unwrap()
    }

    fn result(success: bool, kind: Option<FailureKind>) -> DeliveryResult {
        DeliveryResult {
            contact_type: ContactType::Caregiver,
            contact_id: 1,
            to_name: "Casey".to_string(),
            to_phone: Some("+15550001111".to_string()),
            success,
            error: kind.map(|k| k.as_str().to_string()),
            error_kind: kind,
            provider_message_id: None,
            attempted_at: Utc::now(),
        }
    }

    #[test]
    fn valid_request_defaults_to_sending() {
        let new = NewAlert::try_from(request(serde_json::json!({
            "type": "emergency",
            "category": "emergency",
            "title": " SOS ",
            "message": "Help",
        })))
        .unwrap();
        assert_eq!(new.alert_type, AlertType::Emergency);
        assert_eq!(new.title, "SOS");
        assert!(new.send_to_contacts);
        assert_eq!(new.data, AlertData::default());
    }

    #[test]
    fn camel_case_send_flag_accepted() {
        let new = NewAlert::try_from(request(serde_json::json!({
            "type": "info",
            "category": "system",
            "title": "t",
            "message": "m",
            "sendToContacts": false,
        })))
        .unwrap();
        assert!(!new.send_to_contacts);
    }

    #[test]
    fn missing_field_is_validation_error() {
        let err = NewAlert::try_from(request(serde_json::json!({
            "type": "emergency",
            "title": "SOS",
            "message": "Help",
        })))
        .unwrap_err();
        assert_matches!(err, CoreError::Validation(ref m) if m == "Missing required fields");
    }

    #[test]
    fn unknown_type_is_validation_error() {
        let err = NewAlert::try_from(request(serde_json::json!({
            "type": "apocalyptic",
            "category": "system",
            "title": "t",
            "message": "m",
        })))
        .unwrap_err();
        assert_matches!(err, CoreError::Validation(ref m) if m.contains("Invalid alert type"));
    }

    #[test]
    fn summary_explains_empty_fan_out() {
        let summary = DeliverySummary::from_results(true, true, &[]);
        assert_eq!(summary.attempted, 0);
        assert_eq!(summary.notice.as_deref(), Some(NOTICE_NO_CONTACTS));
    }

    #[test]
    fn no_contacts_notice_only_when_contacts_apply() {
        // An info/system alert reaches nobody by rule, not for lack of contacts.
        let summary = DeliverySummary::from_results(true, false, &[]);
        assert_eq!(summary.attempted, 0);
        assert!(summary.notice.is_none());
    }

    #[test]
    fn summary_explains_missing_provider() {
        let results = [
            result(false, Some(FailureKind::NotConfigured)),
            result(false, Some(FailureKind::NotConfigured)),
        ];
        let summary = DeliverySummary::from_results(false, true, &results);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.notice.as_deref(), Some(NOTICE_NOT_CONFIGURED));
    }

    #[test]
    fn summary_counts_partial_delivery() {
        let results = [result(true, None), result(false, Some(FailureKind::Rejected))];
        let summary = DeliverySummary::from_results(true, true, &results);
        assert_eq!(summary.delivered, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.notice.as_deref(), Some(NOTICE_PARTIAL));

        let summary = DeliverySummary::from_results(true, true, &[result(true, None)]);
        assert!(summary.notice.is_none());
    }
}
