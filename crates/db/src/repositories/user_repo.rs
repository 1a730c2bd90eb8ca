//! Repository for the `users` table.

use glucotrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User, ACCOUNT_STATUS_ACTIVE};

/// Column list for `users` queries.
const COLUMNS: &str = "id, email, full_name, phone, account_status, created_at, updated_at";

/// Read access to user accounts, plus insertion for seeding.
pub struct UserRepo;

impl UserRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, full_name, phone, account_status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(input.email.trim().to_lowercase())
            .bind(&input.full_name)
            .bind(&input.phone)
            .bind(
                input
                    .account_status
                    .as_deref()
                    .unwrap_or(ACCOUNT_STATUS_ACTIVE),
            )
            .fetch_one(pool)
            .await
    }
}
