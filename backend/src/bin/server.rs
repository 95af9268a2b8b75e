//! Sightings dashboard HTTP server.
//!
//! Loads the dataset once, runs the first pass, then serves the dashboard
//! page and the REST API.
//!
//! # Usage
//!
//! ```bash
//! DATASET_PATH=data/sightings.csv cargo run --bin sightings-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `DASHBOARD_CONFIG`: Path to `dashboard.toml` (optional)
//! - `DATASET_PATH`: Overrides `[dataset] path` from the configuration
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use sightings_analytics::config::ServerConfig;
use sightings_analytics::http::{create_router, AppState};
use sightings_analytics::services::load_dataset;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting sightings dashboard server");

    let server = ServerConfig::from_env()?;
    let config = server.dashboard_config()?;

    // A failed load is terminal: no retry, exit non-zero.
    let dataset = match load_dataset(&config.dataset.path, &config).await {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };
    info!(
        "Dataset {} loaded: {} records",
        dataset.path.display(),
        dataset.records.len()
    );

    let state = AppState::from_dataset(dataset, &config);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", server.host, server.port).parse()?;
    info!("Server listening on http://{}", addr);
    info!("Dashboard: http://{}/", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
