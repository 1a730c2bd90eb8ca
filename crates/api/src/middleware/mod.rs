//! Request extractors and middleware.
//!
//! - [`auth::AuthUser`] -- Resolves the authenticated, active user from a
//!   bearer header or `token` cookie.
//! - [`rate_limit::limit`] -- Per-client request quota on `/api`.

pub mod auth;
pub mod rate_limit;
