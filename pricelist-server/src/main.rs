mod api;
mod catalog;
mod config;
mod simulator;

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use anyhow::{Context, Result};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::simulator::RandomSimulator;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pricelist_server=info,tower_http=info"))
        )
        .init();

    tracing::info!("Starting pricelist-server");

    // Config file is optional; defaults cover everything
    let config = match std::env::args().nth(1) {
        Some(config_path) => {
            let config = Config::load(&config_path)
                .with_context(|| format!("Failed to load config from {}", config_path))?;
            tracing::info!("Loaded config from {}", config_path);
            config
        }
        None => Config::default(),
    };
    let config = config.with_port_override(std::env::var("PORT").ok().as_deref())?;

    let catalog = Catalog::seeded();
    anyhow::ensure!(!catalog.is_empty(), "Catalog has no services");
    tracing::info!("Catalog seeded with {} services", catalog.len());

    let simulator = RandomSimulator::new(&config.simulator)?;
    tracing::info!(
        "Simulating {:?}..={:?} delay, {:.0}% failures",
        config.simulator.min_delay(),
        config.simulator.max_delay(),
        config.simulator.failure_rate * 100.0
    );

    // Build API router
    let app_state = api::routes::AppState {
        catalog: Arc::new(catalog),
        simulator: Arc::new(simulator),
    };
    let app = api::routes::router(app_state);

    // Bind HTTP server
    let listener = tokio::net::TcpListener::bind(config.api.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", config.api.listen))?;

    tracing::info!("The server is running on {}", config.api.listen);

    // Run server with graceful shutdown
    let cancel = CancellationToken::new();
    let server_cancel = cancel.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_cancel.cancelled().await })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutdown signal received");
    cancel.cancel();

    if let Err(e) = server_handle.await {
        tracing::error!("Server task failed: {}", e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
