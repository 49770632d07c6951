//! Nestbox webhook capture service.
//!
//! Main entry point for the server. Loads configuration, selects the
//! store backend, and runs the HTTP server until a shutdown signal.

use std::sync::Arc;

use anyhow::{Context, Result};
use nestbox_api::{start_server, AppState, Config, StoreBackend};
use nestbox_core::{DynamoConfig, DynamoStore, EventStore, MemoryStore, WebhookService};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration before tracing so the log filter is configurable
    let config = Config::load()?;

    init_tracing(&config.rust_log);

    info!("Starting nestbox webhook capture service");

    let addr = config.server_addr()?;
    info!(
        server_addr = %addr,
        backend = ?config.store_backend,
        table_name = %config.table_name,
        ttl_seconds = config.ttl_seconds,
        "Configuration loaded"
    );

    let store = create_store(&config).await?;
    store.health_check().await.context("store is not reachable")?;
    info!("Store connection verified");

    let service = Arc::new(WebhookService::new(store.clone(), config.to_service_config()));
    let state = AppState::new(service, store);

    info!(addr = %addr, "Nestbox is ready to receive webhooks");

    start_server(state, addr, config.request_timeout()).await.context("server failed")?;

    info!("Nestbox shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
///
/// `RUST_LOG` takes priority over the configured filter so operators can
/// raise verbosity without touching the config file.
fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer().with_target(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

/// Builds the configured store backend.
async fn create_store(config: &Config) -> Result<Arc<dyn EventStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            info!("Using in-memory store backend");
            Ok(Arc::new(MemoryStore::new()))
        },
        StoreBackend::Dynamodb => {
            info!(table_name = %config.table_name, "Using DynamoDB store backend");
            let sdk_config =
                aws_config::defaults(aws_config::BehaviorVersion::latest()).load().await;
            let store = DynamoStore::new(
                &sdk_config,
                DynamoConfig {
                    table_name: config.table_name.clone(),
                    region: config.aws_region.clone(),
                    endpoint: config.aws_endpoint_url.clone(),
                    timeout_ms: Some(config.request_timeout().as_millis() as u64),
                },
            );
            Ok(Arc::new(store))
        },
    }
}
