//! Webhook capture domain: event store, attribute codec, request
//! normalizer, and the webhook service.
//!
//! Captures inbound HTTP requests sent to generated webhook endpoints,
//! persists each as an event in a single wide-column table, and serves
//! the webhook's identity and recent event history back to callers. The
//! HTTP layer lives in `nestbox-api`; this crate exposes no HTTP types
//! beyond the header map consumed by the normalizer.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod keys;
pub mod models;
pub mod normalize;
pub mod service;
pub mod store;
pub mod time;

pub use error::{CoreError, Result};
pub use models::{EventId, EventRecord, Webhook, WebhookId};
pub use normalize::{normalize, CapturedRequest};
pub use service::{ServiceConfig, WebhookService};
pub use store::{DynamoConfig, DynamoStore, EventStore, MemoryStore};
pub use time::{Clock, SystemClock, TestClock};
