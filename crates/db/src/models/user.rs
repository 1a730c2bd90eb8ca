//! User account model.

use glucotrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Only accounts in this state may use the API.
pub const ACCOUNT_STATUS_ACTIVE: &str = "active";

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub account_status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.account_status == ACCOUNT_STATUS_ACTIVE
    }
}

/// DTO for inserting a user (seeding and tests).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub account_status: Option<String>,
}
