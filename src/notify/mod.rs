//! Outbound alerting.
//!
//! # Modules
//!
//! - `webhook` - aggregated alert message building and webhook delivery

mod webhook;

pub use crate::notify::webhook::{DispatchOutcome, Notify, WebhookNotifier};

#[cfg(test)]
pub use crate::notify::webhook::MockNotify;
