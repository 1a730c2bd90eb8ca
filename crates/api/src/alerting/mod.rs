//! Alert orchestration: contact resolution, dispatch, and lifecycle
//! transitions on top of the alert store.
//!
//! Every path that raises an alert (the alerts API, SOS, and glucose
//! readings) goes through [`service::create_alert`].

pub mod resolver;
pub mod service;

pub use resolver::resolve_contacts;
pub use service::{
    acknowledge, create_alert, get_alert, list_alerts, resolve, CreateAlertRequest,
    CreatedAlert, DeliverySummary, NewAlert,
};
