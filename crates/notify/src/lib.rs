//! Outbound alert notifications.
//!
//! - [`SmsSender`]: the provider seam, with [`TwilioSms`] as the production
//!   implementation.
//! - [`Dispatcher`]: makes one bounded send attempt to a resolved recipient
//!   and reports it as a [`DeliveryResult`], never failing.
//! - [`compose_alert_sms`]: the message body sent to contacts.

pub mod dispatcher;
pub mod message;
pub mod sms;

pub use dispatcher::{DeliveryResult, Dispatcher, FailureKind, Recipient, DEFAULT_SEND_TIMEOUT};
pub use message::compose_alert_sms;
pub use sms::{SmsConfig, SmsError, SmsReceipt, SmsSender, TwilioSms};
