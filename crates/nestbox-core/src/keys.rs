//! Key construction for the single-table layout.
//!
//! The service owns the key scheme exclusively; callers never build or see
//! partition and sort keys. Two item kinds share one table:
//!
//! - webhook descriptor: `pk = WEBHOOK#<webhookId>`, `sk = "WEBHOOK"`
//! - webhook event: `pk = EVENT#<eventId>`, `sk = WEBHOOK#<webhookId>`, with
//!   secondary index keys `GSI1PK = EVENT#<webhookId>` and `GSI1SK` set to an
//!   hour-granularity time bucket so queries scan a bounded recent window.

use chrono::{DateTime, Utc};

use crate::models::{EventId, WebhookId};

/// Sort key constant for webhook descriptor items.
pub const WEBHOOK_SK: &str = "WEBHOOK";

/// Prefix for webhook-scoped keys.
const WEBHOOK_PREFIX: &str = "WEBHOOK#";

/// Prefix for event-scoped keys.
const EVENT_PREFIX: &str = "EVENT#";

/// Partition key for a webhook descriptor.
pub fn webhook_pk(id: WebhookId) -> String {
    format!("{WEBHOOK_PREFIX}{id}")
}

/// Partition key for an event item.
pub fn event_pk(id: EventId) -> String {
    format!("{EVENT_PREFIX}{id}")
}

/// Sort key for an event item, referencing the owning webhook.
pub fn event_sk(webhook_id: WebhookId) -> String {
    format!("{WEBHOOK_PREFIX}{webhook_id}")
}

/// Secondary index partition key grouping all events of one webhook.
pub fn event_index_pk(webhook_id: WebhookId) -> String {
    format!("{EVENT_PREFIX}{webhook_id}")
}

/// Hour-granularity time bucket used as the secondary index sort key.
pub fn hour_bucket(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d%H").to_string()
}

/// Day-granularity prefix matching every hour bucket of one UTC day.
pub fn day_prefix(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d").to_string()
}

/// Recovers the event id from an event partition key.
pub fn event_id_from_pk(pk: &str) -> Option<EventId> {
    pk.strip_prefix(EVENT_PREFIX)?.parse().ok()
}
