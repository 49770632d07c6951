//! Webhook domain service.
//!
//! Translates the externally meaningful operations (create a webhook,
//! fetch it, record an inbound request, list recent events) into store
//! operations. Owns identifier generation, key construction, TTL
//! stamping, and stripping of internal bookkeeping attributes before
//! anything is returned to a caller.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, info, instrument};

use crate::{
    error::{CoreError, Result},
    keys,
    models::{EventId, EventItem, EventRecord, Webhook, WebhookId, WebhookItem},
    normalize::CapturedRequest,
    store::{attr, EventStore},
    time::{Clock, SystemClock},
};

/// Domain service configuration, injected by the bootstrap layer.
///
/// The core never reads ambient environment state directly.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL that webhook ingestion URLs are derived from.
    pub base_url: String,
    /// Expiry window applied to descriptors and events alike.
    pub ttl: Duration,
}

impl ServiceConfig {
    /// Creates a service configuration.
    pub fn new(base_url: impl Into<String>, ttl: Duration) -> Self {
        Self { base_url: base_url.into(), ttl }
    }
}

/// Service implementing the four public webhook operations.
///
/// Stateless between calls; any number of operations may run concurrently.
/// Every write is an independently keyed full-item upsert, so there is no
/// write contention and no in-process synchronization.
pub struct WebhookService {
    store: Arc<dyn EventStore>,
    config: ServiceConfig,
    clock: Arc<dyn Clock>,
}

impl WebhookService {
    /// Creates a service over the given store using the system clock.
    pub fn new(store: Arc<dyn EventStore>, config: ServiceConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock::new()))
    }

    /// Creates a service with an injected clock, for deterministic tests.
    pub fn with_clock(
        store: Arc<dyn EventStore>,
        config: ServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { store, config, clock }
    }

    /// Creates a new webhook and returns its public descriptor.
    ///
    /// A single item write; there is no partial-success state. Reads of a
    /// freshly created webhook are deterministic only where the store
    /// offers strongly consistent point reads (both bundled backends do).
    #[instrument(name = "create_webhook", skip(self))]
    pub async fn create_webhook(&self) -> Result<Webhook> {
        let id = WebhookId::new();
        let url = self.ingest_url(id);
        let now = self.clock.now();

        let item = WebhookItem {
            pk: keys::webhook_pk(id),
            sk: keys::WEBHOOK_SK.to_string(),
            url: url.clone(),
            expires_at: self.expires_at(now),
            created_at: timestamp(now),
        };

        self.store
            .put(attr::to_item(&item)?)
            .await
            .map_err(|e| with_context(e, &format!("creating webhook {id}")))?;

        info!(webhook_id = %id, "webhook created");
        Ok(Webhook { id, url })
    }

    /// Fetches a webhook's public descriptor by id.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::WebhookNotFound` when no descriptor exists,
    /// and `CoreError::Deserialization` when the stored item does not
    /// match the descriptor shape.
    #[instrument(name = "get_webhook", skip(self), fields(webhook_id = %id))]
    pub async fn get_webhook(&self, id: WebhookId) -> Result<Webhook> {
        let pk = keys::webhook_pk(id);

        let item = self
            .store
            .get_by_key(&pk, keys::WEBHOOK_SK)
            .await
            .map_err(|e| with_context(e, &format!("fetching webhook {id}")))?
            .ok_or_else(|| CoreError::WebhookNotFound(id.to_string()))?;

        let descriptor: WebhookItem = attr::from_item(&item)?;
        Ok(Webhook { id, url: descriptor.url })
    }

    /// Records one captured inbound request as an event.
    ///
    /// Fire-and-forget from the HTTP boundary's perspective: there is no
    /// check that the owning webhook still exists, so capture never fails
    /// because the descriptor expired. This is a deliberate
    /// availability-over-consistency choice.
    #[instrument(
        name = "record_event",
        skip(self, captured),
        fields(webhook_id = %webhook_id, method = %captured.method)
    )]
    pub async fn record_event(
        &self,
        webhook_id: WebhookId,
        captured: CapturedRequest,
    ) -> Result<EventId> {
        let event_id = EventId::new();
        let now = self.clock.now();

        let item = EventItem {
            pk: keys::event_pk(event_id),
            sk: keys::event_sk(webhook_id),
            gsi1_pk: keys::event_index_pk(webhook_id),
            gsi1_sk: keys::hour_bucket(now),
            method: captured.method,
            headers: captured.headers,
            data: captured.data,
            status_code: None,
            expires_at: self.expires_at(now),
            created_at: timestamp(now),
        };

        self.store
            .put(attr::to_item(&item)?)
            .await
            .map_err(|e| with_context(e, &format!("recording event for webhook {webhook_id}")))?;

        debug!(event_id = %event_id, "event recorded");
        Ok(event_id)
    }

    /// Lists unexpired events for a webhook, newest first.
    ///
    /// Queries cover every UTC day the TTL window can span, so events
    /// recorded shortly before midnight stay visible for their full TTL
    /// instead of vanishing at the calendar-day boundary. Index reads are
    /// only eventually consistent on the production backend; a very
    /// recent event may take a moment to appear.
    #[instrument(name = "list_events", skip(self), fields(webhook_id = %webhook_id))]
    pub async fn list_events(&self, webhook_id: WebhookId) -> Result<Vec<EventRecord>> {
        let now = self.clock.now();
        let index_pk = keys::event_index_pk(webhook_id);

        let mut items = Vec::new();
        for prefix in self.window_day_prefixes(now) {
            let batch = self
                .store
                .query_by_index(&index_pk, &prefix)
                .await
                .map_err(|e| with_context(e, &format!("listing events for {webhook_id}")))?;
            items.extend(batch);
        }

        let cutoff = now.timestamp();
        let mut records = Vec::with_capacity(items.len());
        for item in &items {
            let event: EventItem = attr::from_item(item)?;
            if event.expires_at <= cutoff {
                continue;
            }

            let id = keys::event_id_from_pk(&event.pk).ok_or_else(|| {
                CoreError::Deserialization(format!("event item has malformed pk: {}", event.pk))
            })?;

            records.push(EventRecord {
                id,
                method: event.method,
                headers: event.headers,
                data: event.data,
                created_at: event.created_at,
                status_code: event.status_code,
            });
        }

        // The store guarantees no order; the contract here is newest first.
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        debug!(count = records.len(), "events listed");
        Ok(records)
    }

    /// Ingestion URL for a webhook id.
    fn ingest_url(&self, id: WebhookId) -> String {
        format!("{}/{id}", self.config.base_url.trim_end_matches('/'))
    }

    /// Absolute expiry for an item stamped at `now`, epoch seconds.
    fn expires_at(&self, now: DateTime<Utc>) -> i64 {
        let window = i64::try_from(self.config.ttl.as_secs()).unwrap_or(i64::MAX);
        now.timestamp().saturating_add(window)
    }

    /// Distinct UTC day prefixes the TTL window can span, oldest first,
    /// ending at `now`. One prefix in the common case; two when `now - ttl`
    /// falls on the previous day; more only under a multi-day TTL.
    fn window_day_prefixes(&self, now: DateTime<Utc>) -> Vec<String> {
        let window = chrono::Duration::seconds(
            i64::try_from(self.config.ttl.as_secs()).unwrap_or(i64::MAX),
        );
        let start = now.checked_sub_signed(window).unwrap_or(now);

        let mut prefixes = Vec::new();
        let mut day = start;
        while keys::day_prefix(day) < keys::day_prefix(now) {
            prefixes.push(keys::day_prefix(day));
            day += chrono::Duration::days(1);
        }
        prefixes.push(keys::day_prefix(now));
        prefixes
    }
}

/// Formats a timestamp in fixed-width RFC 3339 with millisecond precision,
/// so that lexicographic order matches chronological order.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Prepends operation context to store errors, leaving the rest untouched.
fn with_context(err: CoreError, context: &str) -> CoreError {
    match err {
        CoreError::Store(msg) => CoreError::Store(format!("{context}: {msg}")),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::store::MemoryStore;

    fn service_with_ttl(ttl: Duration) -> WebhookService {
        WebhookService::new(
            Arc::new(MemoryStore::new()),
            ServiceConfig::new("http://localhost:8080/api/v1/webhook/updatewebhook", ttl),
        )
    }

    #[test]
    fn ingest_url_joins_without_duplicate_slash() {
        let service = WebhookService::new(
            Arc::new(MemoryStore::new()),
            ServiceConfig::new("http://example.test/hooks/", Duration::from_secs(3600)),
        );
        let id = WebhookId::new();
        assert_eq!(service.ingest_url(id), format!("http://example.test/hooks/{id}"));
    }

    #[test]
    fn window_spans_one_day_in_the_common_case() {
        let service = service_with_ttl(Duration::from_secs(3600));
        let noon = Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
        assert_eq!(service.window_day_prefixes(noon), vec!["20240307"]);
    }

    #[test]
    fn window_spans_two_days_just_after_midnight() {
        let service = service_with_ttl(Duration::from_secs(3600));
        let shortly_after_midnight = Utc.with_ymd_and_hms(2024, 3, 8, 0, 30, 0).unwrap();
        assert_eq!(
            service.window_day_prefixes(shortly_after_midnight),
            vec!["20240307", "20240308"]
        );
    }

    #[test]
    fn window_covers_every_day_of_a_multi_day_ttl() {
        let service = service_with_ttl(Duration::from_secs(3 * 24 * 3600));
        let noon = Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
        assert_eq!(
            service.window_day_prefixes(noon),
            vec!["20240304", "20240305", "20240306", "20240307"]
        );
    }

    #[test]
    fn timestamps_sort_lexicographically() {
        let earlier = Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
        let later = earlier + chrono::Duration::milliseconds(5);
        assert!(timestamp(earlier) < timestamp(later));
    }

    #[test]
    fn store_errors_gain_operation_context() {
        let err = with_context(CoreError::store("timeout"), "creating webhook x");
        assert_eq!(err.to_string(), "store error: creating webhook x: timeout");

        // Non-store errors pass through untouched.
        let err = with_context(CoreError::WebhookNotFound("x".to_string()), "ctx");
        assert_eq!(err.to_string(), "webhook not found: x");
    }
}
