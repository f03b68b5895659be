use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::data::Value;
use crate::query::{derived, run_analysis, run_filter, Analysis, ChartHint, FilterSelection};
use crate::store::{QueryResult, RideStore};

/// Application state shared across handlers
pub struct AppState {
    pub store: Arc<RideStore>,
}

// ============================================================================
// Health Check
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================================
// Analysis Catalog
// ============================================================================

#[derive(Serialize)]
pub struct AnalysisInfo {
    pub id: &'static str,
    pub title: &'static str,
    pub chart: ChartHint,
}

#[derive(Serialize)]
pub struct AnalysesResponse {
    pub analyses: Vec<AnalysisInfo>,
}

pub async fn list_analyses() -> Json<AnalysesResponse> {
    let analyses = Analysis::ALL
        .iter()
        .map(|a| AnalysisInfo {
            id: a.id(),
            title: a.title(),
            chart: a.chart(),
        })
        .collect();
    Json(AnalysesResponse { analyses })
}

#[derive(Serialize)]
pub struct AnalysisResponse {
    pub id: &'static str,
    pub title: &'static str,
    pub chart: ChartHint,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub row_count: usize,
    pub execution_time_ms: u64,
}

pub async fn analysis(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let analysis: Analysis = id
        .parse()
        .map_err(|_| ApiError::NotFound(format!("unknown analysis '{}'", id)))?;

    let result =
        run_analysis(&state.store, analysis).map_err(|e| ApiError::Query(e.to_string()))?;

    Ok(Json(AnalysisResponse {
        id: analysis.id(),
        title: analysis.title(),
        chart: analysis.chart(),
        row_count: result.row_count(),
        columns: result.columns,
        rows: result.rows,
        execution_time_ms: result.execution_time_ms,
    }))
}

// ============================================================================
// Filtered View
// ============================================================================

/// A small grouped table derived in memory for charting
#[derive(Serialize)]
pub struct GroupedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl From<QueryResult> for GroupedTable {
    fn from(result: QueryResult) -> Self {
        Self {
            columns: result.columns,
            rows: result.rows,
        }
    }
}

#[derive(Serialize)]
pub struct FilteredResponse {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub row_count: usize,
    pub execution_time_ms: u64,
    pub status_counts: GroupedTable,
    pub avg_distance_by_vehicle: GroupedTable,
}

pub async fn filter_rides(
    State(state): State<Arc<AppState>>,
    Json(selection): Json<FilterSelection>,
) -> Result<Json<FilteredResponse>, ApiError> {
    let result =
        run_filter(&state.store, &selection).map_err(|e| ApiError::Query(e.to_string()))?;

    let status_counts = derived::count_by(&result, "booking_status");
    let avg_distance = derived::mean_by(&result, "vehicle_type", "ride_distance");

    Ok(Json(FilteredResponse {
        row_count: result.row_count(),
        execution_time_ms: result.execution_time_ms,
        status_counts: status_counts.into(),
        avg_distance_by_vehicle: avg_distance.into(),
        columns: result.columns,
        rows: result.rows,
    }))
}

// ============================================================================
// Filter Options
// ============================================================================

#[derive(Serialize)]
pub struct FilterOptionsResponse {
    pub vehicle_types: Vec<String>,
    pub booking_statuses: Vec<String>,
    pub payment_methods: Vec<String>,
    pub min_booking_date: Option<String>,
    pub max_booking_date: Option<String>,
    pub total_rows: i64,
}

pub async fn filter_options(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FilterOptionsResponse>, ApiError> {
    let columns = state
        .store
        .columns()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    // Nothing loaded yet: empty controls, not an error
    if columns.is_empty() {
        return Ok(Json(FilterOptionsResponse {
            vehicle_types: Vec::new(),
            booking_statuses: Vec::new(),
            payment_methods: Vec::new(),
            min_booking_date: None,
            max_booking_date: None,
            total_rows: 0,
        }));
    }

    let distinct_strings = |column: &str| -> Result<Vec<String>, ApiError> {
        if !columns.iter().any(|c| c == column) {
            return Ok(Vec::new());
        }
        let values = state
            .store
            .distinct(column)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(values.iter().map(|v| v.to_string()).collect())
    };

    let (min_date, max_date) = if columns.iter().any(|c| c == "booking_date") {
        let result = state
            .store
            .query(
                "SELECT MIN(booking_date), MAX(booking_date) FROM rides",
                &[],
            )
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        let bound = |idx: usize| {
            result
                .rows
                .first()
                .and_then(|r| r.get(idx))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };
        (bound(0), bound(1))
    } else {
        (None, None)
    };

    Ok(Json(FilterOptionsResponse {
        vehicle_types: distinct_strings("vehicle_type")?,
        booking_statuses: distinct_strings("booking_status")?,
        payment_methods: distinct_strings("payment_method")?,
        min_booking_date: min_date,
        max_booking_date: max_date,
        total_rows: state
            .store
            .row_count()
            .map_err(|e| ApiError::Internal(e.to_string()))?,
    }))
}

// ============================================================================
// Schema
// ============================================================================

#[derive(Serialize)]
pub struct SchemaResponse {
    pub table: &'static str,
    pub columns: Vec<String>,
}

pub async fn schema(State(state): State<Arc<AppState>>) -> Result<Json<SchemaResponse>, ApiError> {
    let columns = state
        .store
        .columns()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(SchemaResponse {
        table: crate::store::RIDES_TABLE,
        columns,
    }))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Query(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Query(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
