//! Configuration management for the nestbox service.

use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use nestbox_core::ServiceConfig;
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "nestbox.toml";
const ENV_PREFIX: &str = "NESTBOX_";

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process store for local development and tests.
    Memory,
    /// DynamoDB-backed production store.
    Dynamodb,
}

/// Complete service configuration with defaults, file, and environment
/// overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables prefixed `NESTBOX_` (highest priority)
/// 2. Configuration file (`nestbox.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// The service works out-of-the-box against the in-memory backend. The
/// core never reads this configuration ambiently; the bootstrap layer
/// loads it once and injects the relevant pieces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server
    /// Server bind address.
    ///
    /// Environment variable: `NESTBOX_HOST`
    #[serde(default = "default_host")]
    pub host: String,
    /// Server bind port.
    ///
    /// Environment variable: `NESTBOX_PORT`
    #[serde(default = "default_port")]
    pub port: u16,
    /// HTTP request timeout in seconds.
    ///
    /// Environment variable: `NESTBOX_REQUEST_TIMEOUT_SECONDS`
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    // Webhooks
    /// Base URL that generated webhook ingestion URLs are derived from.
    ///
    /// Environment variable: `NESTBOX_BASE_URL`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Expiry window in seconds applied to webhooks and events.
    ///
    /// Environment variable: `NESTBOX_TTL_SECONDS`
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    // Storage
    /// Which store backend to run against.
    ///
    /// Environment variable: `NESTBOX_STORE_BACKEND` (`memory` | `dynamodb`)
    #[serde(default = "default_store_backend")]
    pub store_backend: StoreBackend,
    /// Storage table name.
    ///
    /// Environment variable: `NESTBOX_TABLE_NAME`
    #[serde(default = "default_table_name")]
    pub table_name: String,
    /// AWS region override for the DynamoDB backend.
    ///
    /// Environment variable: `NESTBOX_AWS_REGION`
    #[serde(default)]
    pub aws_region: Option<String>,
    /// Endpoint override for the DynamoDB backend, e.g. a local DynamoDB.
    ///
    /// Environment variable: `NESTBOX_AWS_ENDPOINT_URL`
    #[serde(default)]
    pub aws_endpoint_url: Option<String>,

    // Logging
    /// Log filter directive.
    ///
    /// Environment variable: `NESTBOX_RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub rust_log: String,
}

impl Config {
    /// Loads configuration from defaults, config file, and environment
    /// variable overrides, then validates it.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX));

        let config: Self = figment.extract().context("failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Converts to the domain service configuration.
    pub fn to_service_config(&self) -> ServiceConfig {
        ServiceConfig::new(self.base_url.clone(), Duration::from_secs(self.ttl_seconds))
    }

    /// HTTP request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Parses the server socket address from host and port.
    pub fn server_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr).context("invalid server address")
    }

    /// Validates configuration values.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.base_url.trim().is_empty() {
            anyhow::bail!("base_url must not be empty");
        }

        if self.table_name.trim().is_empty() {
            anyhow::bail!("table_name must not be empty");
        }

        if self.ttl_seconds == 0 {
            anyhow::bail!("ttl_seconds must be greater than 0");
        }

        if self.request_timeout_seconds == 0 {
            anyhow::bail!("request_timeout_seconds must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
            base_url: default_base_url(),
            ttl_seconds: default_ttl_seconds(),
            store_backend: default_store_backend(),
            table_name: default_table_name(),
            aws_region: None,
            aws_endpoint_url: None,
            rust_log: default_log_filter(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_base_url() -> String {
    "http://localhost:8080/api/v1/webhook/updatewebhook".to_string()
}

fn default_ttl_seconds() -> u64 {
    3600
}

fn default_store_backend() -> StoreBackend {
    StoreBackend::Memory
}

fn default_table_name() -> String {
    "nestbox-events".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}
