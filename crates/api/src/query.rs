//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /api/alerts`.
#[derive(Debug, Deserialize)]
pub struct AlertListParams {
    #[serde(rename = "type")]
    pub alert_type: Option<String>,
    pub resolved: Option<bool>,
    pub limit: Option<i64>,
}

/// Query parameters for list endpoints with an `active_only` flag.
#[derive(Debug, Deserialize)]
pub struct ActiveOnlyParams {
    #[serde(default)]
    pub active_only: bool,
}

/// Query parameters for `GET /api/dashboard/stats`.
#[derive(Debug, Deserialize)]
pub struct StatsParams {
    /// Window length in days, counted back from now.
    pub days: Option<i64>,
}
