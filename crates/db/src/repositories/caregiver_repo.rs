//! Repository for the `caregivers` table.

use glucotrack_core::contact::DEFAULT_ACCESS_LEVEL;
use glucotrack_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::caregiver::{Caregiver, CreateCaregiver};

/// Column list for `caregivers` queries.
const COLUMNS: &str = "id, user_id, name, relationship, email, phone, emergency_contact, \
    alerts_enabled, alert_preferences, access_level, invite_status, invite_token, \
    created_at, updated_at";

/// Provides CRUD operations for caregivers.
pub struct CaregiverRepo;

impl CaregiverRepo {
    /// List a user's caregivers, emergency contacts first, then newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Caregiver>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM caregivers \
             WHERE user_id = $1 \
             ORDER BY emergency_contact DESC, created_at DESC"
        );
        sqlx::query_as::<_, Caregiver>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a caregiver with a fresh invite token.
    ///
    /// `phone` must already be normalized; the email is lower-cased here.
    /// A duplicate email for the same user violates `uq_caregivers_user_email`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateCaregiver,
        phone: &str,
    ) -> Result<Caregiver, sqlx::Error> {
        let query = format!(
            "INSERT INTO caregivers \
                (user_id, name, relationship, email, phone, emergency_contact, alerts_enabled, \
                 alert_preferences, access_level, invite_token) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        let prefs = input.alert_preferences.unwrap_or_default();
        let access_level = input.access_level.as_deref().unwrap_or(DEFAULT_ACCESS_LEVEL);
        sqlx::query_as::<_, Caregiver>(&query)
            .bind(user_id)
            .bind(input.name.trim())
            .bind(&input.relationship)
            .bind(input.email.trim().to_lowercase())
            .bind(phone)
            .bind(input.emergency_contact)
            .bind(input.alerts_enabled)
            .bind(Json(prefs))
            .bind(access_level)
            .bind(uuid::Uuid::new_v4().simple().to_string())
            .fetch_one(pool)
            .await
    }

    /// Caregivers who receive emergency and critical alerts for `user_id`:
    /// flagged as an emergency contact with alerts enabled.
    pub async fn list_alert_eligible(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Caregiver>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM caregivers \
             WHERE user_id = $1 AND emergency_contact = true AND alerts_enabled = true \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Caregiver>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
