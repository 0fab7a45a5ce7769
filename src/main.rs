use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;
mod domain;
mod metrics;
mod store;

use api::AppState;
use config::{Config, StoreBackend};
use domain::order::OrderCommandHandler;
use store::{DocumentStore, MemoryStore, ScyllaStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,orders_delivery=debug")),
        )
        .init();

    tracing::info!("🚀 Starting delivery order intake service");

    let config = Config::from_env();
    tracing::info!(
        bind_addr = %config.bind_addr,
        currency = %config.currency,
        store = ?config.store,
        "Configuration loaded"
    );

    let store: Arc<dyn DocumentStore> = match config.store {
        StoreBackend::Scylla => {
            Arc::new(ScyllaStore::connect(&config.scylla_node, &config.keyspace).await?)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; orders will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    tracing::info!("Initializing metrics");
    let metrics = Arc::new(metrics::Metrics::new()?);

    let orders = Arc::new(OrderCommandHandler::new(store, config.currency.clone()));

    let state = AppState { orders, metrics };
    api::start_http_server(state, &config.bind_addr).await?;

    Ok(())
}
