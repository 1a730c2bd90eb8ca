//! Repository for the `glucose_readings` table.

use glucotrack_core::glucose::{HIGH_THRESHOLD, LOW_THRESHOLD};
use glucotrack_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::glucose_reading::{CreateGlucoseReading, GlucoseReading, GlucoseStats};

/// Column list for `glucose_readings` queries.
const COLUMNS: &str = "id, user_id, value, unit, meal_context, notes, recorded_at, created_at";

pub struct GlucoseReadingRepo;

impl GlucoseReadingRepo {
    /// Insert a reading; `recorded_at` defaults to now.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateGlucoseReading,
    ) -> Result<GlucoseReading, sqlx::Error> {
        let query = format!(
            "INSERT INTO glucose_readings (user_id, value, meal_context, notes, recorded_at) \
             VALUES ($1, $2, $3, $4, COALESCE($5, NOW())) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GlucoseReading>(&query)
            .bind(user_id)
            .bind(input.value)
            .bind(input.meal_context.as_str())
            .bind(&input.notes)
            .bind(input.recorded_at)
            .fetch_one(pool)
            .await
    }

    /// List a user's readings, most recent first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<GlucoseReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM glucose_readings \
             WHERE user_id = $1 \
             ORDER BY recorded_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, GlucoseReading>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of readings for a user.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT COUNT(*) FROM glucose_readings WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;
        Ok(count.unwrap_or(0))
    }

    /// Count and average readings recorded at or after `since`, bucketed by
    /// the normal range (both bounds inclusive).
    pub async fn stats_since(
        pool: &PgPool,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<GlucoseStats, sqlx::Error> {
        sqlx::query_as::<_, GlucoseStats>(
            "SELECT COUNT(*) AS total_readings, \
                    AVG(value) AS avg_glucose, \
                    COUNT(*) FILTER (WHERE value >= $3 AND value <= $4) AS in_range, \
                    COUNT(*) FILTER (WHERE value < $3) AS low_readings, \
                    COUNT(*) FILTER (WHERE value > $4) AS high_readings \
             FROM glucose_readings \
             WHERE user_id = $1 AND recorded_at >= $2",
        )
        .bind(user_id)
        .bind(since)
        .bind(LOW_THRESHOLD)
        .bind(HIGH_THRESHOLD)
        .fetch_one(pool)
        .await
    }
}
