use std::sync::Arc;

use glucotrack_notify::Dispatcher;

use crate::config::ServerConfig;
use crate::middleware::rate_limit::{build_limiter, ClientRateLimiter};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: glucotrack_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Outbound alert notifications.
    pub dispatcher: Arc<Dispatcher>,
    /// Per-client request counters for `/api`.
    pub rate_limiter: Arc<ClientRateLimiter>,
}

impl AppState {
    pub fn new(pool: glucotrack_db::DbPool, config: ServerConfig, dispatcher: Dispatcher) -> Self {
        let rate_limiter = build_limiter(&config.rate_limit);
        Self {
            pool,
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
            rate_limiter,
        }
    }
}
