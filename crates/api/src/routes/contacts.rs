//! Route definitions for caregiver and doctor contacts.

use axum::routing::get;
use axum::Router;

use crate::handlers::{caregivers, doctors};
use crate::state::AppState;

/// ```text
/// GET  /caregivers -> list
/// POST /caregivers -> create
/// GET  /doctors    -> list
/// POST /doctors    -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/caregivers", get(caregivers::list).post(caregivers::create))
        .route("/doctors", get(doctors::list).post(doctors::create))
}
