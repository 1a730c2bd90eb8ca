//! Repository for the `medications` table.

use glucotrack_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::medication::{CreateMedication, Medication};

/// Column list for `medications` queries.
const COLUMNS: &str = "id, user_id, name, medication_type, dose, times_per_day, instructions, \
    is_active, created_at, updated_at";

pub struct MedicationRepo;

impl MedicationRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateMedication,
    ) -> Result<Medication, sqlx::Error> {
        let query = format!(
            "INSERT INTO medications \
                (user_id, name, medication_type, dose, times_per_day, instructions) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Medication>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.medication_type)
            .bind(Json(&input.dose))
            .bind(input.times_per_day)
            .bind(&input.instructions)
            .fetch_one(pool)
            .await
    }

    /// List a user's medications, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        active_only: bool,
    ) -> Result<Vec<Medication>, sqlx::Error> {
        let filter = if active_only {
            "AND is_active = true"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM medications \
             WHERE user_id = $1 {filter} \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Medication>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Medication>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM medications WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Medication>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Replace a medication's details. `is_active` is left unchanged when
    /// `None`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &CreateMedication,
        is_active: Option<bool>,
    ) -> Result<Option<Medication>, sqlx::Error> {
        let query = format!(
            "UPDATE medications SET \
                name = $3, medication_type = $4, dose = $5, times_per_day = $6, \
                instructions = $7, is_active = COALESCE($8, is_active), updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Medication>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.medication_type)
            .bind(Json(&input.dose))
            .bind(input.times_per_day)
            .bind(&input.instructions)
            .bind(is_active)
            .fetch_optional(pool)
            .await
    }

    /// Stop tracking a medication. The row is kept so past reports still
    /// resolve it.
    pub async fn deactivate(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Medication>, sqlx::Error> {
        let query = format!(
            "UPDATE medications SET is_active = false, updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Medication>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn count_active(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM medications WHERE user_id = $1 AND is_active = true",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
