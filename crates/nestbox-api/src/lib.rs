//! Nestbox HTTP API.
//!
//! Routes, handlers, configuration loading, and the server lifecycle
//! for the webhook capture service. Domain logic lives in
//! `nestbox-core`; this crate only adapts it to HTTP.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::sync::Arc;

use nestbox_core::{EventStore, WebhookService};

pub mod config;
pub mod error;
pub mod handlers;
pub mod server;

pub use config::{Config, StoreBackend};
pub use error::ApiError;
pub use server::{create_router, start_server};

/// Shared application state threaded through every handler.
#[derive(Clone)]
pub struct AppState {
    /// Webhook domain service.
    pub service: Arc<WebhookService>,
    /// Event store handle, probed directly by the readiness check.
    pub store: Arc<dyn EventStore>,
}

impl AppState {
    /// Creates application state from a service and its backing store.
    pub fn new(service: Arc<WebhookService>, store: Arc<dyn EventStore>) -> Self {
        Self { service, store }
    }
}
