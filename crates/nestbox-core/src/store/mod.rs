//! Durable wide-column storage with point lookups and one secondary index
//! query pattern.
//!
//! The trait attaches no business meaning to keys beyond the key scheme;
//! key construction lives in the service layer. Writes are full-item
//! upserts with no precondition check, so the last writer wins and there
//! are no read-modify-write races to guard against. Store-level failures
//! propagate to the caller unmodified; retry policy, if any, belongs to
//! the caller or the transport layer.

use async_trait::async_trait;

pub mod attr;
pub mod dynamo;
pub mod memory;

pub use attr::{AttrValue, Item};
pub use dynamo::{DynamoConfig, DynamoStore};
pub use memory::MemoryStore;

use crate::error::Result;

/// Storage abstraction over one wide-column table.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Upserts one item keyed by its `pk`/`sk` attributes. Full replace,
    /// not merge.
    async fn put(&self, item: Item) -> Result<()>;

    /// Point read by exact partition and sort key.
    async fn get_by_key(&self, pk: &str, sk: &str) -> Result<Option<Item>>;

    /// Queries the secondary index: partition key equality plus sort-key
    /// prefix match. A day-granularity prefix over hour-granularity sort
    /// keys expresses "events in this day" without scanning history.
    async fn query_by_index(&self, index_pk: &str, sort_prefix: &str) -> Result<Vec<Item>>;

    /// Deletes one item by exact key. Deleting an absent item is not an
    /// error.
    async fn delete(&self, pk: &str, sk: &str) -> Result<()>;

    /// Verifies the store is reachable. Used by readiness probes.
    async fn health_check(&self) -> Result<()>;
}
