//! Per-client rate limiting for `/api`.
//!
//! Clients are keyed by the socket peer address. `x-forwarded-for` is read
//! only when the peer is a configured trusted proxy; the client is then the
//! right-most hop that is not itself a trusted proxy. Requests without a peer
//! address share an `unknown` bucket.

use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use glucotrack_core::error::CoreError;
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tokio::task::JoinHandle;

use crate::config::RateLimitConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Keyed limiter shared by every `/api` request.
pub type ClientRateLimiter = DefaultKeyedRateLimiter<String>;

/// Build the limiter for `config`.
///
/// A client may spend `max_requests` at once; capacity then refills evenly
/// so that the full allowance is back after one `window`.
pub fn build_limiter(config: &RateLimitConfig) -> Arc<ClientRateLimiter> {
    let burst = NonZeroU32::new(config.max_requests).unwrap_or(NonZeroU32::MIN);
    let quota = Quota::with_period(config.window / burst.get())
        .unwrap_or_else(|| Quota::per_second(burst))
        .allow_burst(burst);
    Arc::new(RateLimiter::keyed(quota))
}

/// Extract the rate-limit key from the request.
pub fn client_key(req: &Request<Body>, trusted_proxies: &[IpAddr]) -> String {
    let Some(peer) = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
    else {
        return "unknown".to_string();
    };

    if !trusted_proxies.contains(&peer) {
        return peer.to_string();
    }

    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| forwarded_client(v, trusted_proxies))
        .unwrap_or(peer)
        .to_string()
}

/// The right-most `x-forwarded-for` hop not added by a trusted proxy.
fn forwarded_client(header: &str, trusted_proxies: &[IpAddr]) -> Option<IpAddr> {
    for hop in header.rsplit(',') {
        match hop.trim().parse::<IpAddr>() {
            Ok(ip) if trusted_proxies.contains(&ip) => continue,
            Ok(ip) => return Some(ip),
            Err(_) => return None,
        }
    }
    None
}

/// Reject the request with 429 once its client is over the limit.
pub async fn limit(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let key = client_key(&req, &state.config.rate_limit.trusted_proxies);

    match state.rate_limiter.check_key(&key) {
        Ok(()) => next.run(req).await,
        Err(not_until) => {
            let retry_after = not_until.wait_time_from(DefaultClock::default().now());
            tracing::warn!(client = %key, retry_after_ms = retry_after.as_millis() as u64, "Rate limit exceeded");
            AppError::Core(CoreError::RateLimited { retry_after }).into_response()
        }
    }
}

/// Periodically forget clients whose allowance has fully refilled.
pub fn spawn_sweeper(limiter: Arc<ClientRateLimiter>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            limiter.retain_recent();
            limiter.shrink_to_fit();
            tracing::debug!(tracked_clients = limiter.len(), "Rate limiter swept");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROXY: &str = "10.0.0.2";

    fn request(peer: Option<&str>, forwarded: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/alerts");
        if let Some(value) = forwarded {
            builder = builder.header("x-forwarded-for", value);
        }
        let mut req = builder.body(Body::empty()).unwrap();
        if let Some(ip) = peer {
            let addr = SocketAddr::new(ip.parse().unwrap(), 5555);
            req.extensions_mut().insert(ConnectInfo(addr));
        }
        req
    }

    fn trusted() -> Vec<IpAddr> {
        vec![PROXY.parse().unwrap()]
    }

    #[test]
    fn untrusted_peer_ignores_forwarded_header() {
        let req = request(Some("198.51.100.4"), Some("203.0.113.7"));
        assert_eq!(client_key(&req, &trusted()), "198.51.100.4");
        assert_eq!(client_key(&req, &[]), "198.51.100.4");
    }

    #[test]
    fn trusted_proxy_uses_right_most_client_hop() {
        // The left-most hop is whatever the client claimed.
        let req = request(Some(PROXY), Some("1.2.3.4, 203.0.113.7"));
        assert_eq!(client_key(&req, &trusted()), "203.0.113.7");

        let req = request(Some(PROXY), Some("203.0.113.7, 10.0.0.2"));
        assert_eq!(client_key(&req, &trusted()), "203.0.113.7");
    }

    #[test]
    fn trusted_proxy_without_usable_header_falls_back_to_peer() {
        assert_eq!(client_key(&request(Some(PROXY), None), &trusted()), PROXY);
        assert_eq!(
            client_key(&request(Some(PROXY), Some("not-an-ip")), &trusted()),
            PROXY
        );
    }

    #[test]
    fn unknown_without_peer() {
        assert_eq!(client_key(&request(None, Some("203.0.113.7")), &trusted()), "unknown");
    }

    #[test]
    fn limiter_allows_burst_then_rejects() {
        let limiter = build_limiter(&RateLimitConfig {
            max_requests: 3,
            window: Duration::from_secs(60),
            trusted_proxies: Vec::new(),
        });
        let key = "198.51.100.4".to_string();
        for _ in 0..3 {
            assert!(limiter.check_key(&key).is_ok());
        }
        assert!(limiter.check_key(&key).is_err());
        assert!(limiter.check_key(&"198.51.100.5".to_string()).is_ok());
    }
}
