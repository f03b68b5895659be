//! CSV loading job
//!
//! Reads a ride export CSV, normalizes its header row into canonical
//! lower-snake-case column names, and replaces the `rides` table with the
//! file's contents. Runs to completion before the dashboard serves queries.

use crate::data::Value;
use crate::store::{RideStore, RIDES_TABLE};
use chrono::NaiveDate;
use rusqlite::types::ToSql;
use std::io::Read;
use std::path::Path;

/// Source date formats seen in ride exports, tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d"];

/// Summary of a completed load
#[derive(Debug, Clone, serde::Serialize)]
pub struct LoadReport {
    pub columns: Vec<String>,
    pub rows_inserted: usize,
}

/// Load a CSV file into the store, replacing any prior `rides` content
pub fn load_csv(store: &RideStore, path: impl AsRef<Path>) -> Result<LoadReport, IngestError> {
    let file = std::fs::File::open(path)?;
    load_csv_reader(store, file)
}

/// Load CSV data from any reader, replacing any prior `rides` content
pub fn load_csv_reader<R: Read>(store: &RideStore, reader: R) -> Result<LoadReport, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let columns: Vec<String> = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            let name = normalize_header(h);
            if name.is_empty() {
                format!("column_{}", idx)
            } else {
                name
            }
        })
        .collect();

    if columns.is_empty() {
        return Err(IngestError::EmptyHeader);
    }

    let quoted: Vec<String> = columns.iter().map(|c| format!("\"{}\"", c)).collect();
    let create_sql = format!("CREATE TABLE {} ({})", RIDES_TABLE, quoted.join(", "));
    let insert_sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        RIDES_TABLE,
        quoted.join(", "),
        vec!["?"; columns.len()].join(", ")
    );

    let date_idx = columns.iter().position(|c| c == "booking_date");

    let mut conn = store.lock();
    let tx = conn.transaction()?;

    // Replace semantics: drop and recreate on every load
    tx.execute_batch(&format!("DROP TABLE IF EXISTS {}", RIDES_TABLE))?;
    tx.execute_batch(&create_sql)?;

    let mut rows_inserted = 0;
    {
        let mut stmt = tx.prepare(&insert_sql)?;
        for record in csv_reader.records() {
            let record = record?;
            let values: Vec<Value> = (0..columns.len())
                .map(|idx| {
                    let cell = record.get(idx).unwrap_or("");
                    if date_idx == Some(idx) {
                        parse_cell_date(cell)
                    } else {
                        parse_cell(cell)
                    }
                })
                .collect();

            let bound: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();
            stmt.execute(bound.as_slice())?;
            rows_inserted += 1;
        }
    }
    tx.commit()?;

    tracing::info!(
        rows = rows_inserted,
        columns = columns.len(),
        "loaded rides table"
    );

    Ok(LoadReport {
        columns,
        rows_inserted,
    })
}

/// Normalize a CSV header into a canonical column name
///
/// Trim, lowercase, spaces to underscores: "Booking Status" -> "booking_status".
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Convert a CSV cell into a typed value
///
/// Empty cells become NULL; integer- and float-looking cells become numbers;
/// everything else stays text.
fn parse_cell(cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Int64(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return Value::Float64(f);
    }
    Value::String(trimmed.to_string())
}

/// Convert a booking-date cell into ISO `YYYY-MM-DD` text
///
/// ISO text collates chronologically, which is what the filter builder's
/// BETWEEN range relies on. Unparseable dates are kept verbatim.
fn parse_cell_date(cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    // Date may carry a time component; the date part is enough for filtering
    let date_part = trimmed.split_whitespace().next().unwrap_or(trimmed);
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return Value::String(date.format("%Y-%m-%d").to_string());
        }
    }
    Value::String(trimmed.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV has no header columns")]
    EmptyHeader,

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),
}
