//! Domain models and strongly-typed identifiers.
//!
//! Defines the public shapes returned to callers (`Webhook`, `EventRecord`)
//! and the persisted item shapes (`WebhookItem`, `EventItem`) whose serde
//! renames mirror the wide-column attribute names. Decoding a fetched item
//! into one of the persisted shapes is the single typed deserialization
//! boundary of the crate; a mismatch is a reported error, never a default.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Strongly-typed webhook identifier.
///
/// Opaque random id generated once at creation. Wraps a UUID to prevent
/// mixing with event ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WebhookId(pub Uuid);

impl WebhookId {
    /// Creates a new random webhook ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WebhookId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WebhookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for WebhookId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for WebhookId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Strongly-typed event identifier, one per captured request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Creates a new random event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EventId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Public webhook descriptor returned to callers.
///
/// Internal bookkeeping attributes (keys, TTL) never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    /// Opaque webhook identifier.
    pub id: WebhookId,
    /// Fully-qualified ingestion URL, immutable after creation.
    pub url: String,
}

/// Public event summary returned by event listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Opaque event identifier.
    pub id: EventId,
    /// HTTP method of the captured request, case as received.
    pub method: String,
    /// Flattened request headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Normalized payload, absent when the request had no body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Response status recorded by older writers; nothing writes it today.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i64>,
}

/// Persisted webhook descriptor item.
///
/// Field names match the wide-column attributes exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookItem {
    /// Partition key, `WEBHOOK#<webhookId>`.
    pub pk: String,
    /// Sort key, the literal `WEBHOOK`.
    pub sk: String,
    /// Fully-qualified ingestion URL.
    pub url: String,
    /// Absolute expiry, epoch seconds. Reclamation is best-effort.
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
    /// Creation timestamp, RFC 3339. Informational.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Persisted webhook event item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventItem {
    /// Partition key, `EVENT#<eventId>`.
    pub pk: String,
    /// Sort key referencing the owning webhook, `WEBHOOK#<webhookId>`.
    pub sk: String,
    /// Secondary index partition key, `EVENT#<webhookId>`.
    #[serde(rename = "GSI1PK")]
    pub gsi1_pk: String,
    /// Secondary index sort key, hour-granularity time bucket.
    #[serde(rename = "GSI1SK")]
    pub gsi1_sk: String,
    /// HTTP method of the captured request.
    pub method: String,
    /// Flattened request headers. Empty maps are omitted on write, so the
    /// read path tolerates the attribute being absent.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Normalized payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Response status recorded by older writers.
    #[serde(rename = "statusCode", default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i64>,
    /// Absolute expiry, epoch seconds.
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
    /// Creation timestamp, RFC 3339.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_id_parses_its_own_display() {
        let id = WebhookId::new();
        let parsed: WebhookId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn webhook_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<WebhookId>().is_err());
        assert!("".parse::<EventId>().is_err());
    }

    #[test]
    fn event_record_serializes_camel_case() {
        let record = EventRecord {
            id: EventId::new(),
            method: "POST".to_string(),
            headers: HashMap::new(),
            data: None,
            created_at: "2024-03-07T10:00:00Z".to_string(),
            status_code: None,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
        // Absent optionals stay off the wire entirely.
        assert!(json.get("data").is_none());
        assert!(json.get("statusCode").is_none());
    }

    #[test]
    fn event_item_tolerates_missing_headers_and_data() {
        let raw = serde_json::json!({
            "pk": "EVENT#7f8d9e10-1111-2222-3333-444455556666",
            "sk": "WEBHOOK#00000000-0000-0000-0000-000000000000",
            "GSI1PK": "EVENT#00000000-0000-0000-0000-000000000000",
            "GSI1SK": "2024030710",
            "method": "GET",
            "expiresAt": 1_709_805_600,
            "createdAt": "2024-03-07T10:00:00Z"
        });

        let item: EventItem = serde_json::from_value(raw).unwrap();
        assert!(item.headers.is_empty());
        assert!(item.data.is_none());
        assert!(item.status_code.is_none());
    }
}
