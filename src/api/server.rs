use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    analysis, filter_options, filter_rides, health_check, list_analyses, schema, AppState,
};
use crate::ingest;
use crate::store::RideStore;

// Embed UI files at compile time
const INDEX_HTML: &str = include_str!("../ui/index.html");
const APP_JS: &str = include_str!("../ui/app.js");

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// SQLite database path; None for an in-memory store
    pub db_path: Option<PathBuf>,
    /// CSV to load at startup, replacing any prior `rides` content
    pub csv_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            db_path: None,
            csv_path: None,
        }
    }
}

// UI file handlers
async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        APP_JS,
    )
        .into_response()
}

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // UI routes
        .route("/", get(serve_index))
        .route("/ui/app.js", get(serve_app_js))
        // Health check
        .route("/health", get(health_check))
        // Analysis catalog
        .route("/api/analyses", get(list_analyses))
        .route("/api/analysis/:id", get(analysis))
        // Filtered view
        .route("/api/rides/filter", post(filter_rides))
        .route("/api/filters/options", get(filter_options))
        // Schema
        .route("/api/schema", get(schema))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Open the table store once; it is shared read-only across requests
    let store = match &config.db_path {
        Some(path) => RideStore::open(path)?,
        None => RideStore::open_in_memory()?,
    };
    let store = Arc::new(store);

    // Optional startup load; the normal flow runs the `load` binary first
    if let Some(csv_path) = &config.csv_path {
        let report = ingest::load_csv(&store, csv_path)?;
        tracing::info!(
            rows = report.rows_inserted,
            path = %csv_path.display(),
            "startup CSV load complete"
        );
    }

    let loaded_columns = store.columns()?;
    if loaded_columns.is_empty() {
        tracing::warn!("rides table is empty or missing; run the `load` binary first");
    }

    let state = Arc::new(AppState { store });
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Starting Ridesight server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Ridesight server stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");

    tracing::info!("Shutdown signal received");
}
