//! Repository for the `alerts` and `alert_recipients` tables.
//!
//! Recipient rows are append-only: this repository inserts them and updates
//! their acknowledgement columns, and never deletes them.

use glucotrack_core::alert::AlertStatus;
use glucotrack_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::alert::{Alert, AlertFilter, AlertRecipient, CreateAlert, NewAlertRecipient};

/// Column list for `alerts` queries.
const COLUMNS: &str = "id, user_id, alert_type, category, title, message, data, status, \
    resolved, resolved_at, priority, dispatched_at, created_at, updated_at";

/// Column list for `alert_recipients` queries.
const RECIPIENT_COLUMNS: &str = "id, alert_id, contact_type, contact_id, to_name, to_phone, \
    sent_at, delivered, error, error_kind, provider_message_id, acknowledged, acknowledged_at";

/// Provides persistence for alerts and their recipient lists.
pub struct AlertRepo;

impl AlertRepo {
    /// Insert a new alert in the `created` state with an empty recipient list.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateAlert,
    ) -> Result<Alert, sqlx::Error> {
        let query = format!(
            "INSERT INTO alerts (user_id, alert_type, category, title, message, data, status, priority) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(user_id)
            .bind(input.alert_type.as_str())
            .bind(input.category.as_str())
            .bind(&input.title)
            .bind(&input.message)
            .bind(Json(&input.data))
            .bind(AlertStatus::Created.as_str())
            .bind(input.priority)
            .fetch_one(pool)
            .await
    }

    /// Append the row for one dispatch attempt.
    ///
    /// Called as soon as the attempt finishes, so a send that happened is
    /// recorded even if the rest of the fan-out never runs. Rows are added
    /// regardless of the alert's status.
    pub async fn append_recipient(
        pool: &PgPool,
        alert_id: DbId,
        attempt: &NewAlertRecipient,
    ) -> Result<AlertRecipient, sqlx::Error> {
        let query = format!(
            "INSERT INTO alert_recipients \
                (alert_id, contact_type, contact_id, to_name, to_phone, sent_at, \
                 delivered, error, error_kind, provider_message_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {RECIPIENT_COLUMNS}"
        );
        sqlx::query_as::<_, AlertRecipient>(&query)
            .bind(alert_id)
            .bind(attempt.contact_type.as_str())
            .bind(attempt.contact_id)
            .bind(&attempt.to_name)
            .bind(&attempt.to_phone)
            .bind(attempt.sent_at)
            .bind(attempt.delivered)
            .bind(&attempt.error)
            .bind(&attempt.error_kind)
            .bind(&attempt.provider_message_id)
            .fetch_one(pool)
            .await
    }

    /// Move the alert to `dispatch_attempted` once its fan-out has run.
    ///
    /// Returns `None` when the alert has already left `created`, e.g. the
    /// owner resolved it while messages were still going out.
    pub async fn mark_dispatched(
        pool: &PgPool,
        alert_id: DbId,
    ) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!(
            "UPDATE alerts SET status = $2, dispatched_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status = ANY($3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(alert_id)
            .bind(AlertStatus::DispatchAttempted.as_str())
            .bind(AlertStatus::DispatchAttempted.predecessors())
            .fetch_optional(pool)
            .await
    }

    /// Find an alert owned by `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        alert_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alerts WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Alert>(&query)
            .bind(alert_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's alerts, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        filter: &AlertFilter,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts \
             WHERE user_id = $1 \
               AND ($2::TEXT IS NULL OR alert_type = $2) \
               AND ($3::BOOLEAN IS NULL OR resolved = $3) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $4"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(user_id)
            .bind(filter.alert_type.map(|t| t.as_str()))
            .bind(filter.resolved)
            .bind(filter.limit)
            .fetch_all(pool)
            .await
    }

    /// Recipient rows for one alert, in insertion order.
    pub async fn list_recipients(
        pool: &PgPool,
        alert_id: DbId,
    ) -> Result<Vec<AlertRecipient>, sqlx::Error> {
        let query = format!(
            "SELECT {RECIPIENT_COLUMNS} FROM alert_recipients \
             WHERE alert_id = $1 \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, AlertRecipient>(&query)
            .bind(alert_id)
            .fetch_all(pool)
            .await
    }

    /// Recipient rows for many alerts at once, grouped by the caller.
    pub async fn list_recipients_for_alerts(
        pool: &PgPool,
        alert_ids: &[DbId],
    ) -> Result<Vec<AlertRecipient>, sqlx::Error> {
        if alert_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {RECIPIENT_COLUMNS} FROM alert_recipients \
             WHERE alert_id = ANY($1) \
             ORDER BY alert_id, id ASC"
        );
        sqlx::query_as::<_, AlertRecipient>(&query)
            .bind(alert_ids)
            .fetch_all(pool)
            .await
    }

    /// Mark one recipient of an alert as having acknowledged it.
    ///
    /// Returns `None` if the recipient does not belong to the alert. A repeat
    /// acknowledgement keeps the original timestamp.
    pub async fn acknowledge_recipient(
        pool: &PgPool,
        alert_id: DbId,
        recipient_id: DbId,
    ) -> Result<Option<AlertRecipient>, sqlx::Error> {
        let query = format!(
            "UPDATE alert_recipients \
             SET acknowledged = true, acknowledged_at = COALESCE(acknowledged_at, NOW()) \
             WHERE id = $1 AND alert_id = $2 \
             RETURNING {RECIPIENT_COLUMNS}"
        );
        sqlx::query_as::<_, AlertRecipient>(&query)
            .bind(recipient_id)
            .bind(alert_id)
            .fetch_optional(pool)
            .await
    }

    /// Close an unresolved alert owned by `user_id`.
    ///
    /// Returns `None` when the alert is missing, not owned, or already
    /// resolved.
    pub async fn resolve(
        pool: &PgPool,
        alert_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!(
            "UPDATE alerts \
             SET status = $3, resolved = true, resolved_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 AND status = ANY($4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(alert_id)
            .bind(user_id)
            .bind(AlertStatus::Resolved.as_str())
            .bind(AlertStatus::Resolved.predecessors())
            .fetch_optional(pool)
            .await
    }
}
