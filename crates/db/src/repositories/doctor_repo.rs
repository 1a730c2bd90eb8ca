//! Repository for the `doctors` table.

use glucotrack_core::contact::DEFAULT_REPORT_FREQUENCY;
use glucotrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::doctor::{CreateDoctor, Doctor};

/// Column list for `doctors` queries.
const COLUMNS: &str = "id, user_id, name, specialty, hospital, email, phone, license_number, \
    verified, report_sharing, report_frequency, next_appointment, notes, created_at, updated_at";

/// Provides CRUD operations for doctors.
pub struct DoctorRepo;

impl DoctorRepo {
    /// List a user's doctors, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Doctor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM doctors WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Doctor>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a doctor. `phone` must already be normalized.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateDoctor,
        phone: &str,
    ) -> Result<Doctor, sqlx::Error> {
        let query = format!(
            "INSERT INTO doctors \
                (user_id, name, specialty, hospital, email, phone, license_number, verified, \
                 report_sharing, report_frequency, next_appointment, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Doctor>(&query)
            .bind(user_id)
            .bind(input.name.trim())
            .bind(&input.specialty)
            .bind(input.hospital.trim())
            .bind(input.email.trim().to_lowercase())
            .bind(phone)
            .bind(&input.license_number)
            .bind(input.verified)
            .bind(input.report_sharing.unwrap_or(true))
            .bind(
                input
                    .report_frequency
                    .as_deref()
                    .unwrap_or(DEFAULT_REPORT_FREQUENCY),
            )
            .bind(input.next_appointment)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Verified doctors for `user_id`, the only ones who receive alerts.
    pub async fn list_verified(pool: &PgPool, user_id: DbId) -> Result<Vec<Doctor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM doctors \
             WHERE user_id = $1 AND verified = true \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Doctor>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
