//! # saro-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the SARO API.
//! Binds to `SARO_HOST:PORT` (default `0.0.0.0:8000`).

use metrics_exporter_prometheus::PrometheusBuilder;
use saro_api::config::{AppConfig, LogFormat};
use saro_api::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    // Initialize structured tracing.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let mut state = AppState::with_config(config.clone());
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state = state.with_prometheus(handle),
        Err(e) => tracing::warn!("Prometheus exporter not installed: {e}. /metrics will be empty."),
    }

    tracing::info!(
        agentic = config.enable_agentic,
        blockchain = config.enable_blockchain,
        seeded = config.rng_seed.is_some(),
        "SARO API configured"
    );

    let app = saro_api::app(state);
    let addr = config.bind_addr();
    tracing::info!("SARO API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
