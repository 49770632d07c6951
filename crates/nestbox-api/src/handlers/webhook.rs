//! Webhook endpoint handlers: create, fetch, capture, and list.
//!
//! The capture handler accepts any method and any body; normalization is
//! total, so the only failure it can surface is a storage failure. There
//! is deliberately no check that the webhook descriptor still exists
//! before recording, so capture keeps working even after expiry.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode},
    Json,
};
use bytes::Bytes;
use nestbox_core::{normalize, CoreError, EventRecord, Webhook, WebhookId};
use tracing::{info, instrument};

use crate::{error::ApiError, AppState};

/// Parses a path segment into a webhook id, rejecting malformed input
/// before any store call.
fn parse_id(raw: &str) -> Result<WebhookId, ApiError> {
    raw.parse::<WebhookId>()
        .map_err(|_| ApiError(CoreError::InvalidKey(format!("not a valid webhook id: {raw}"))))
}

/// Creates a new webhook and returns its id and ingestion URL.
#[instrument(name = "create_webhook", skip(state))]
pub async fn create_webhook(State(state): State<AppState>) -> Result<Json<Webhook>, ApiError> {
    let webhook = state.service.create_webhook().await?;
    info!(webhook_id = %webhook.id, "webhook created");
    Ok(Json(webhook))
}

/// Returns a webhook's public descriptor, or 404 when none exists.
#[instrument(name = "get_webhook", skip(state))]
pub async fn get_webhook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Webhook>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.get_webhook(id).await?))
}

/// Captures one inbound request as an event. Any method, any body.
#[instrument(
    name = "capture_event",
    skip(state, headers, body),
    fields(method = %method, body_len = body.len())
)]
pub async fn capture_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;

    let captured = normalize(method.as_str(), &headers, &body);
    let event_id = state.service.record_event(id, captured).await?;

    info!(webhook_id = %id, event_id = %event_id, "event captured");
    Ok(StatusCode::OK)
}

/// Lists unexpired events for a webhook, newest first.
#[instrument(name = "list_events", skip(state))]
pub async fn list_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<EventRecord>>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.list_events(id).await?))
}
