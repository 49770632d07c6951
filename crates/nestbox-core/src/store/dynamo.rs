//! DynamoDB store backend.
//!
//! One table keyed on `pk`/`sk` with a global secondary index named
//! `LookUp` on `GSI1PK`/`GSI1SK` projecting all attributes, and TTL on
//! `expiresAt`. Point reads are strongly consistent; GSI queries are
//! eventually consistent because DynamoDB offers no consistent index
//! reads. No retry or backoff happens here beyond the SDK defaults.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use aws_sdk_dynamodb::{types::AttributeValue, Client};
use aws_smithy_types::timeout::TimeoutConfig;

use crate::{
    error::{CoreError, Result},
    store::{attr::AttrValue, EventStore, Item},
};

/// Name of the secondary index used for event listings.
const INDEX_NAME: &str = "LookUp";

/// DynamoDB backend configuration.
#[derive(Debug, Clone)]
pub struct DynamoConfig {
    /// Table name.
    pub table_name: String,
    /// AWS region override; SDK default when unset.
    pub region: Option<String>,
    /// Endpoint override, e.g. a local DynamoDB.
    pub endpoint: Option<String>,
    /// Operation timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// DynamoDB-backed `EventStore`.
#[derive(Clone)]
pub struct DynamoStore {
    client: Client,
    table_name: String,
}

impl std::fmt::Debug for DynamoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoStore").field("table_name", &self.table_name).finish()
    }
}

impl DynamoStore {
    /// Creates a store from the ambient SDK configuration plus overrides.
    ///
    /// Inherits HTTP client, credentials, and retry configuration from
    /// `sdk_config`, then applies the region, endpoint, and timeout
    /// overrides from `config`.
    pub fn new(sdk_config: &aws_config::SdkConfig, config: DynamoConfig) -> Self {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);

        if let Some(region) = config.region {
            builder = builder.region(aws_sdk_dynamodb::config::Region::new(region));
        }

        if let Some(endpoint) = config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        if let Some(timeout_ms) = config.timeout_ms {
            let timeout = TimeoutConfig::builder()
                .operation_timeout(Duration::from_millis(timeout_ms))
                .build();
            builder = builder.timeout_config(timeout);
        }

        Self { client: Client::from_conf(builder.build()), table_name: config.table_name }
    }

    /// Creates a store from a pre-built client (for testing).
    pub fn from_client(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }

    /// Converts one attribute to the SDK wire type.
    fn to_wire(attr: AttrValue) -> AttributeValue {
        match attr {
            AttrValue::S(s) => AttributeValue::S(s),
            AttrValue::N(n) => AttributeValue::N(n),
            AttrValue::Bool(b) => AttributeValue::Bool(b),
            AttrValue::M(map) => AttributeValue::M(Self::item_to_wire(map)),
            AttrValue::L(list) => {
                AttributeValue::L(list.into_iter().map(Self::to_wire).collect())
            },
        }
    }

    /// Converts one SDK attribute back, dropping unrecognized buckets
    /// (binary, sets, null markers) silently.
    fn from_wire(attr: &AttributeValue) -> Option<AttrValue> {
        match attr {
            AttributeValue::S(s) => Some(AttrValue::S(s.clone())),
            AttributeValue::N(n) => Some(AttrValue::N(n.clone())),
            AttributeValue::Bool(b) => Some(AttrValue::Bool(*b)),
            AttributeValue::M(map) => Some(AttrValue::M(Self::item_from_wire(map))),
            AttributeValue::L(list) => {
                Some(AttrValue::L(list.iter().filter_map(Self::from_wire).collect()))
            },
            _ => None,
        }
    }

    fn item_to_wire(item: Item) -> HashMap<String, AttributeValue> {
        item.into_iter().map(|(k, v)| (k, Self::to_wire(v))).collect()
    }

    fn item_from_wire(item: &HashMap<String, AttributeValue>) -> Item {
        item.iter().filter_map(|(k, v)| Self::from_wire(v).map(|attr| (k.clone(), attr))).collect()
    }
}

#[async_trait]
impl EventStore for DynamoStore {
    async fn put(&self, item: Item) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(Self::item_to_wire(item)))
            .send()
            .await
            .map_err(|e| CoreError::store(format!("DynamoDB PutItem failed: {e}")))?;

        Ok(())
    }

    async fn get_by_key(&self, pk: &str, sk: &str) -> Result<Option<Item>> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("pk", AttributeValue::S(pk.to_string()))
            .key("sk", AttributeValue::S(sk.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| CoreError::store(format!("DynamoDB GetItem failed for {pk}: {e}")))?;

        Ok(response.item().map(Self::item_from_wire))
    }

    async fn query_by_index(&self, index_pk: &str, sort_prefix: &str) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        let mut last_evaluated_key = None;

        loop {
            let mut request = self
                .client
                .query()
                .table_name(&self.table_name)
                .index_name(INDEX_NAME)
                .key_condition_expression("GSI1PK = :pk AND begins_with(GSI1SK, :prefix)")
                .expression_attribute_values(":pk", AttributeValue::S(index_pk.to_string()))
                .expression_attribute_values(
                    ":prefix",
                    AttributeValue::S(sort_prefix.to_string()),
                );

            if let Some(key) = last_evaluated_key.take() {
                request = request.set_exclusive_start_key(Some(key));
            }

            let response = request.send().await.map_err(|e| {
                CoreError::store(format!("DynamoDB Query failed for {index_pk}: {e}"))
            })?;

            items.extend(response.items().iter().map(Self::item_from_wire));

            match response.last_evaluated_key() {
                Some(key) if !key.is_empty() => {
                    last_evaluated_key = Some(key.clone());
                },
                _ => break,
            }
        }

        Ok(items)
    }

    async fn delete(&self, pk: &str, sk: &str) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("pk", AttributeValue::S(pk.to_string()))
            .key("sk", AttributeValue::S(sk.to_string()))
            .send()
            .await
            .map_err(|e| CoreError::store(format!("DynamoDB DeleteItem failed for {pk}: {e}")))?;

        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        self.client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|e| CoreError::store(format!("DynamoDB DescribeTable failed: {e}")))?;

        Ok(())
    }
}
