//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token validation (and generation, for trusted
//!   issuers and tests).

pub mod jwt;
