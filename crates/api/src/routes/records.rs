use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{dashboard, glucose, medications};
use crate::state::AppState;

/// Health record routes.
///
/// ```text
/// GET    /glucose           -> list
/// GET    /medications       -> list
/// POST   /medications       -> create
/// GET    /medications/{id}  -> get_by_id
/// PUT    /medications/{id}  -> update
/// DELETE /medications/{id}  -> deactivate
/// GET    /dashboard/stats   -> glucose and medication summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/glucose", get(glucose::list))
        .route("/medications", get(medications::list).post(medications::create))
        .route(
            "/medications/{id}",
            get(medications::get_by_id)
                .put(medications::update)
                .delete(medications::deactivate),
        )
        .route("/dashboard/stats", get(dashboard::stats))
}

/// ```text
/// POST /glucose -> create (may raise an alert)
/// ```
pub fn dispatch_router() -> Router<AppState> {
    Router::new().route("/glucose", post(glucose::create))
}
