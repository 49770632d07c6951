//! HTTP request handlers for the webhook capture API.

pub mod health;
pub mod webhook;

pub use health::{liveness_check, readiness_check};
pub use webhook::{capture_event, create_webhook, get_webhook, list_events};
