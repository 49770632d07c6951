//! In-process store backend for tests and local development.
//!
//! Holds items in a `RwLock`-guarded map keyed by `(pk, sk)` and answers
//! index queries with a linear scan over the `GSI1PK`/`GSI1SK` attributes.
//! Semantics match the production backend, including prefix matching and
//! last-writer-wins upserts; reads here are always strongly consistent.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::{CoreError, Result},
    store::{attr::AttrValue, EventStore, Item},
};

/// In-memory `EventStore` implementation.
#[derive(Clone, Default)]
pub struct MemoryStore {
    items: Arc<RwLock<HashMap<(String, String), Item>>>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items currently held. Test helper.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the store holds no items.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    fn string_attr(item: &Item, name: &str) -> Option<String> {
        match item.get(name) {
            Some(AttrValue::S(s)) => Some(s.clone()),
            _ => None,
        }
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn put(&self, item: Item) -> Result<()> {
        let pk = Self::string_attr(&item, "pk")
            .ok_or_else(|| CoreError::InvalidKey("item is missing a pk attribute".to_string()))?;
        let sk = Self::string_attr(&item, "sk")
            .ok_or_else(|| CoreError::InvalidKey("item is missing an sk attribute".to_string()))?;

        self.items.write().await.insert((pk, sk), item);
        Ok(())
    }

    async fn get_by_key(&self, pk: &str, sk: &str) -> Result<Option<Item>> {
        Ok(self.items.read().await.get(&(pk.to_string(), sk.to_string())).cloned())
    }

    async fn query_by_index(&self, index_pk: &str, sort_prefix: &str) -> Result<Vec<Item>> {
        let items = self.items.read().await;

        Ok(items
            .values()
            .filter(|item| {
                Self::string_attr(item, "GSI1PK").is_some_and(|pk| pk == index_pk)
                    && Self::string_attr(item, "GSI1SK")
                        .is_some_and(|sk| sk.starts_with(sort_prefix))
            })
            .cloned()
            .collect())
    }

    async fn delete(&self, pk: &str, sk: &str) -> Result<()> {
        self.items.write().await.remove(&(pk.to_string(), sk.to_string()));
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
