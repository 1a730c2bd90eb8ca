//! Route definitions for alerts and the emergency SOS trigger.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{alerts, sos};
use crate::state::AppState;

/// ```text
/// GET  /alerts                                          -> list
/// GET  /alerts/{id}                                     -> get_by_id
/// POST /alerts/{id}/recipients/{recipient_id}/acknowledge -> acknowledge
/// POST /alerts/{id}/resolve                             -> resolve
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(alerts::list))
        .route("/alerts/{id}", get(alerts::get_by_id))
        .route(
            "/alerts/{id}/recipients/{recipient_id}/acknowledge",
            post(alerts::acknowledge),
        )
        .route("/alerts/{id}/resolve", post(alerts::resolve))
}

/// Routes that create an alert and fan it out before responding.
///
/// ```text
/// POST /alerts -> create
/// POST /sos    -> trigger
/// ```
pub fn dispatch_router() -> Router<AppState> {
    Router::new()
        .route("/alerts", post(alerts::create))
        .route("/sos", post(sos::trigger))
}
