//! Ridesight loading job
//!
//! Reads a ride export CSV into the SQLite database, replacing any prior
//! `rides` content, then exits. Run this to completion before starting the
//! dashboard server.
//!
//! Usage: load <csv-path> [db-path]
//!
//! Defaults: csv-path from RIDESIGHT_CSV, db-path from RIDESIGHT_DB
//! (falling back to rides.sqlite).

use ridesight::ingest::load_csv;
use ridesight::store::RideStore;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ridesight=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let csv_path = args
        .next()
        .map(PathBuf::from)
        .or_else(|| std::env::var("RIDESIGHT_CSV").ok().map(PathBuf::from))
        .ok_or("usage: load <csv-path> [db-path]")?;
    let db_path = args
        .next()
        .map(PathBuf::from)
        .or_else(|| std::env::var("RIDESIGHT_DB").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("rides.sqlite"));

    tracing::info!("Loading {} into {}", csv_path.display(), db_path.display());

    let store = RideStore::open(&db_path)?;
    let report = load_csv(&store, &csv_path)?;

    tracing::info!(
        "Done: {} rows across {} columns",
        report.rows_inserted,
        report.columns.len()
    );
    Ok(())
}
