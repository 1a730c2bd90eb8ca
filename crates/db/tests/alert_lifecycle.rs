//! Integration tests for alert persistence: creation, dispatch recording,
//! filtering, acknowledgement, and resolution.

use chrono::Utc;
use glucotrack_core::alert::{AlertCategory, AlertData, AlertStatus, AlertType, ContactType};
use glucotrack_db::models::alert::{AlertFilter, CreateAlert, NewAlertRecipient};
use glucotrack_db::models::user::CreateUser;
use glucotrack_db::repositories::{AlertRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, email: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            full_name: "Test Patient".to_string(),
            phone: None,
            account_status: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_alert(alert_type: AlertType, category: AlertCategory) -> CreateAlert {
    CreateAlert {
        alert_type,
        category,
        title: "Low glucose".to_string(),
        message: "Reading of 48 mg/dL".to_string(),
        data: AlertData {
            glucose_value: Some(48.0),
            ..AlertData::default()
        },
        priority: glucotrack_core::alert::priority_for(alert_type),
    }
}

fn attempt(contact_id: i64, delivered: bool) -> NewAlertRecipient {
    NewAlertRecipient {
        contact_type: ContactType::Caregiver,
        contact_id,
        to_name: format!("Contact {contact_id}"),
        to_phone: Some("+15550001111".to_string()),
        sent_at: Utc::now(),
        delivered,
        error: (!delivered).then(|| "provider rejected".to_string()),
        error_kind: (!delivered).then(|| "rejected".to_string()),
        provider_message_id: delivered.then(|| format!("SM{contact_id}")),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_then_record_attempts(pool: PgPool) {
    let user_id = seed_user(&pool, "a1@test.local").await;
    let alert = AlertRepo::create(&pool, user_id, &new_alert(AlertType::Critical, AlertCategory::Glucose))
        .await
        .unwrap();
    assert_eq!(alert.lifecycle(), AlertStatus::Created);
    assert_eq!(alert.priority, 4);
    assert!(!alert.resolved);
    assert_eq!(alert.data["glucose_value"], 48.0);

    for a in [attempt(1, true), attempt(2, false)] {
        AlertRepo::append_recipient(&pool, alert.id, &a).await.unwrap();
    }
    let alert = AlertRepo::mark_dispatched(&pool, alert.id)
        .await
        .unwrap()
        .unwrap();
    let recipients = AlertRepo::list_recipients(&pool, alert.id).await.unwrap();
    assert_eq!(alert.lifecycle(), AlertStatus::DispatchAttempted);
    assert!(alert.dispatched_at.is_some());
    assert_eq!(recipients.len(), 2);
    assert!(recipients[0].delivered);
    assert_eq!(recipients[1].error_kind.as_deref(), Some("rejected"));
    assert!(recipients.iter().all(|r| !r.acknowledged));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dispatch_with_no_recipients_still_advances(pool: PgPool) {
    let user_id = seed_user(&pool, "a2@test.local").await;
    let alert = AlertRepo::create(&pool, user_id, &new_alert(AlertType::Info, AlertCategory::System))
        .await
        .unwrap();

    let alert = AlertRepo::mark_dispatched(&pool, alert.id)
        .await
        .unwrap()
        .unwrap();
    assert!(AlertRepo::list_recipients(&pool, alert.id)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(alert.lifecycle(), AlertStatus::DispatchAttempted);

    // Only a `created` alert can be marked.
    assert!(AlertRepo::mark_dispatched(&pool, alert.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn resolve_during_dispatch_keeps_recipient_rows(pool: PgPool) {
    let user_id = seed_user(&pool, "a8@test.local").await;
    let alert = AlertRepo::create(&pool, user_id, &new_alert(AlertType::Emergency, AlertCategory::Emergency))
        .await
        .unwrap();

    AlertRepo::append_recipient(&pool, alert.id, &attempt(1, true))
        .await
        .unwrap();
    AlertRepo::resolve(&pool, alert.id, user_id)
        .await
        .unwrap()
        .unwrap();
    AlertRepo::append_recipient(&pool, alert.id, &attempt(2, true))
        .await
        .unwrap();

    // The fan-out finishing after the resolve must not reopen or fail.
    assert!(AlertRepo::mark_dispatched(&pool, alert.id)
        .await
        .unwrap()
        .is_none());

    let current = AlertRepo::find_for_user(&pool, alert.id, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.lifecycle(), AlertStatus::Resolved);
    assert!(current.dispatched_at.is_none());

    let recipients = AlertRepo::list_recipients(&pool, alert.id).await.unwrap();
    let ids: Vec<i64> = recipients.iter().map(|r| r.contact_id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_and_orders_newest_first(pool: PgPool) {
    let user_id = seed_user(&pool, "a3@test.local").await;
    let other = seed_user(&pool, "a4@test.local").await;

    let first = AlertRepo::create(&pool, user_id, &new_alert(AlertType::Warning, AlertCategory::Glucose))
        .await
        .unwrap();
    let second = AlertRepo::create(&pool, user_id, &new_alert(AlertType::Emergency, AlertCategory::Emergency))
        .await
        .unwrap();
    AlertRepo::create(&pool, other, &new_alert(AlertType::Emergency, AlertCategory::Emergency))
        .await
        .unwrap();

    let all = AlertRepo::list_for_user(
        &pool,
        user_id,
        &AlertFilter {
            limit: 50,
            ..AlertFilter::default()
        },
    )
    .await
    .unwrap();
    let ids: Vec<i64> = all.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let emergencies = AlertRepo::list_for_user(
        &pool,
        user_id,
        &AlertFilter {
            alert_type: Some(AlertType::Emergency),
            resolved: None,
            limit: 50,
        },
    )
    .await
    .unwrap();
    assert_eq!(emergencies.len(), 1);
    assert_eq!(emergencies[0].id, second.id);

    let limited = AlertRepo::list_for_user(
        &pool,
        user_id,
        &AlertFilter {
            limit: 1,
            ..AlertFilter::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(limited.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn acknowledge_keeps_first_timestamp(pool: PgPool) {
    let user_id = seed_user(&pool, "a5@test.local").await;
    let alert = AlertRepo::create(&pool, user_id, &new_alert(AlertType::Critical, AlertCategory::Glucose))
        .await
        .unwrap();
    let rid = AlertRepo::append_recipient(&pool, alert.id, &attempt(7, true))
        .await
        .unwrap()
        .id;

    let first = AlertRepo::acknowledge_recipient(&pool, alert.id, rid)
        .await
        .unwrap()
        .unwrap();
    assert!(first.acknowledged);
    let second = AlertRepo::acknowledge_recipient(&pool, alert.id, rid)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.acknowledged_at, second.acknowledged_at);

    // Recipient id belongs to a different alert.
    assert!(AlertRepo::acknowledge_recipient(&pool, alert.id + 1, rid)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn resolve_is_terminal_and_scoped_to_owner(pool: PgPool) {
    let user_id = seed_user(&pool, "a6@test.local").await;
    let stranger = seed_user(&pool, "a7@test.local").await;
    let alert = AlertRepo::create(&pool, user_id, &new_alert(AlertType::Warning, AlertCategory::Medication))
        .await
        .unwrap();

    assert!(AlertRepo::resolve(&pool, alert.id, stranger)
        .await
        .unwrap()
        .is_none());

    let resolved = AlertRepo::resolve(&pool, alert.id, user_id)
        .await
        .unwrap()
        .unwrap();
    assert!(resolved.resolved);
    assert!(resolved.resolved_at.is_some());
    assert_eq!(resolved.lifecycle(), AlertStatus::Resolved);

    // A second resolve finds nothing to update.
    assert!(AlertRepo::resolve(&pool, alert.id, user_id)
        .await
        .unwrap()
        .is_none());

    let unresolved = AlertRepo::list_for_user(
        &pool,
        user_id,
        &AlertFilter {
            alert_type: None,
            resolved: Some(false),
            limit: 50,
        },
    )
    .await
    .unwrap();
    assert!(unresolved.is_empty());
}
