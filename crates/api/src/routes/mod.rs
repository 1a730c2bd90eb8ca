pub mod alerts;
pub mod contacts;
pub mod health;
pub mod records;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` routes that answer from the database alone.
///
/// Route hierarchy:
///
/// ```text
/// /alerts                                          list
/// /alerts/{id}                                     get
/// /alerts/{id}/recipients/{recipient_id}/acknowledge   acknowledge (POST)
/// /alerts/{id}/resolve                             resolve (POST)
///
/// /caregivers                                      list, create
/// /doctors                                         list, create
///
/// /glucose                                         list
/// /medications                                     list, create
/// /medications/{id}                                get, update, deactivate
/// /dashboard/stats                                 summary
/// ```
///
/// Every route requires authentication.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(alerts::router())
        .merge(contacts::router())
        .merge(records::router())
}

/// Build the `/api` routes that may send SMS before responding.
///
/// ```text
/// /alerts                                          create (POST)
/// /sos                                             emergency SOS (POST)
/// /glucose                                         record reading (POST)
/// ```
///
/// Their response time depends on the SMS provider, so they are kept out of
/// the request timeout.
pub fn dispatch_routes() -> Router<AppState> {
    Router::new()
        .merge(alerts::dispatch_router())
        .merge(records::dispatch_router())
}
