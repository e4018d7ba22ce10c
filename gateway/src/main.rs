//! Triage Gateway server - webhook receiver for the issue triage pipeline.
//!
//! This binary provides the ingestion boundary of the pipeline:
//! - Receives GitHub webhooks
//! - Verifies request signatures
//! - Deduplicates deliveries against the Postgres ledger
//! - Publishes normalized events to RabbitMQ
//!
//! Classification, assignment, and GitHub patching happen in the separate
//! triage worker that consumes the queue.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gateway::db::{connect_pool, init_schema, DeliveryLedger};
use gateway::web::{router, AppState};
use gateway::{Config, IngestService, Publisher};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("gateway_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        db_max_connections = config.db_max_connections,
        webhook_secret_configured = !config.github_webhook_secret.is_empty(),
        "config_loaded"
    );

    if config.github_webhook_secret.is_empty() {
        warn!("webhook_secret_empty");
    }

    // Connect to PostgreSQL and apply the schema
    let pool = connect_pool(&config).await?;
    init_schema(&pool).await?;

    // Create RabbitMQ publisher
    let publisher = Publisher::new(config.amqp_url.clone());
    info!("rabbitmq_publisher_created");

    // Create application state
    let ingest = IngestService::new(pool.clone(), DeliveryLedger::new(), publisher.clone());
    let state = AppState::new(config.clone(), ingest);

    // Build the router
    let app = router(state).layer(TraceLayer::new_for_http());

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "gateway_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Release shared resources
    publisher.close().await;
    pool.close().await;

    info!("gateway_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("gateway_shutting_down");
}
