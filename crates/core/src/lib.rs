//! Pure domain logic for the GlucoTrack alerting backend.
//!
//! Nothing in this crate performs I/O. The database and HTTP layers call into
//! these modules for validation, classification, and eligibility decisions.

pub mod alert;
pub mod contact;
pub mod credential;
pub mod dose;
pub mod eligibility;
pub mod error;
pub mod glucose;
pub mod types;
