//! Ridesight Server
//!
//! Run with: cargo run
//!
//! Environment variables:
//! - RIDESIGHT_HOST: Bind address (default: 0.0.0.0)
//! - RIDESIGHT_PORT: Port number (default: 8080)
//! - RIDESIGHT_DB: SQLite database path (default: rides.sqlite)
//! - RIDESIGHT_CSV: Optional CSV to load at startup (replaces table content)
//! - RUST_LOG: Log level (default: info)
//!
//! The normal flow runs the `load` binary to completion first, then starts
//! this server against the same database file.

use ridesight::api::{run_server, ServerConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ridesight=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse configuration from environment
    let host = std::env::var("RIDESIGHT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("RIDESIGHT_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let db_path = std::env::var("RIDESIGHT_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("rides.sqlite"));
    let csv_path = std::env::var("RIDESIGHT_CSV").ok().map(PathBuf::from);

    let config = ServerConfig {
        host,
        port,
        db_path: Some(db_path),
        csv_path,
    };

    tracing::info!("Ridesight configuration:");
    tracing::info!("  Host: {}:{}", config.host, config.port);
    if let Some(db) = &config.db_path {
        tracing::info!("  Database: {}", db.display());
    }
    match &config.csv_path {
        Some(csv) => tracing::info!("  Startup CSV load: {}", csv.display()),
        None => tracing::info!("  Startup CSV load: none (expecting a prior `load` run)"),
    }

    run_server(config).await
}
