//! SQLite-backed table store for ride data
//!
//! Holds the single `rides` table. The dashboard only reads; the loading job
//! (`ridesight::ingest`, or the standalone `load` binary) writes, and is
//! expected to finish before the server starts.

use crate::data::Value;
use parking_lot::{Mutex, MutexGuard};
use rusqlite::types::ToSql;
use rusqlite::Connection;
use std::path::Path;

/// Name of the single table every query runs against
pub const RIDES_TABLE: &str = "rides";

/// Handle to the rides table store
///
/// Wraps one SQLite connection behind a mutex; queries are request/response
/// and read-mostly, so serializing them is fine.
pub struct RideStore {
    conn: Mutex<Connection>,
}

impl RideStore {
    /// Open (or create) a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (tests, scratch sessions)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a read-only SQL statement with bound parameters
    ///
    /// Returns the full result set with column names in statement order.
    /// Malformed SQL or a type mismatch surfaces as the store's own error;
    /// the caller decides whether that becomes an empty table or a message.
    pub fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, StoreError> {
        let start = std::time::Instant::now();
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql)?;

        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let bound: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
        let mut raw_rows = stmt.query(bound.as_slice())?;

        let mut rows = Vec::new();
        while let Some(row) = raw_rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                values.push(Value::from_sql(row.get_ref(idx)?));
            }
            rows.push(values);
        }

        Ok(QueryResult {
            columns,
            rows,
            execution_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Column names of the rides table, in declaration order
    ///
    /// Empty when the table has not been created yet.
    pub fn columns(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", RIDES_TABLE))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Distinct non-null values of a column, sorted
    ///
    /// Used to populate the dashboard's multi-select controls. The column
    /// name comes from our own fixed set, never from user input.
    pub fn distinct(&self, column: &str) -> Result<Vec<Value>, StoreError> {
        let sql = format!(
            "SELECT DISTINCT \"{}\" FROM {} WHERE \"{}\" IS NOT NULL ORDER BY 1",
            column, RIDES_TABLE, column
        );
        Ok(self.query(&sql, &[])?.rows.into_iter().flatten().collect())
    }

    /// Total row count of the rides table
    pub fn row_count(&self) -> Result<i64, StoreError> {
        let result = self.query(&format!("SELECT COUNT(*) FROM {}", RIDES_TABLE), &[])?;
        Ok(result
            .rows
            .first()
            .and_then(|r| r.first())
            .and_then(|v| v.as_i64())
            .unwrap_or(0))
    }

    /// Lock the underlying connection for write access (loader only)
    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }
}

impl std::fmt::Debug for RideStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RideStore").finish_non_exhaustive()
    }
}

/// Query execution result: ordered rows with named columns
#[derive(Debug, Clone, serde::Serialize)]
pub struct QueryResult {
    /// Column names
    pub columns: Vec<String>,
    /// Result rows
    pub rows: Vec<Vec<Value>>,
    /// Execution time in milliseconds
    pub execution_time_ms: u64,
}

impl QueryResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of a named column, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store error: {0}")]
    Sql(#[from] rusqlite::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_store() -> RideStore {
        let store = RideStore::open_in_memory().unwrap();
        store
            .lock()
            .execute_batch(
                "CREATE TABLE rides (
                    booking_id TEXT,
                    customer_id TEXT,
                    vehicle_type TEXT,
                    booking_status TEXT,
                    booking_value REAL
                 );
                 INSERT INTO rides VALUES
                    ('B1', 'C1', 'Mini', 'Success', 100.0),
                    ('B2', 'C2', 'Prime Sedan', 'Success', 250.0),
                    ('B3', 'C1', 'Mini', 'Canceled by Driver', 500.0);",
            )
            .unwrap();
        store
    }

    #[test]
    fn test_query_all_rows() {
        let store = seed_store();
        let result = store.query("SELECT * FROM rides", &[]).unwrap();

        assert_eq!(result.row_count(), 3);
        assert_eq!(result.columns.len(), 5);
        assert_eq!(result.columns[0], "booking_id");
    }

    #[test]
    fn test_query_with_bound_params() {
        let store = seed_store();
        let result = store
            .query(
                "SELECT booking_id FROM rides WHERE vehicle_type = ?",
                &[Value::String("Mini".to_string())],
            )
            .unwrap();

        assert_eq!(result.row_count(), 2);
    }

    #[test]
    fn test_query_empty_result_is_ok() {
        let store = seed_store();
        let result = store
            .query(
                "SELECT * FROM rides WHERE vehicle_type = ?",
                &[Value::String("Bike".to_string())],
            )
            .unwrap();

        assert_eq!(result.row_count(), 0);
        assert_eq!(result.columns.len(), 5);
    }

    #[test]
    fn test_malformed_sql_is_error() {
        let store = seed_store();
        assert!(store.query("SELEKT * FROM rides", &[]).is_err());
    }

    #[test]
    fn test_columns() {
        let store = seed_store();
        let columns = store.columns().unwrap();

        assert!(columns.contains(&"vehicle_type".to_string()));
        assert!(columns.contains(&"booking_status".to_string()));
        assert!(!columns.contains(&"booking_date".to_string()));
    }

    #[test]
    fn test_columns_before_load_is_empty() {
        let store = RideStore::open_in_memory().unwrap();
        assert!(store.columns().unwrap().is_empty());
    }

    #[test]
    fn test_distinct() {
        let store = seed_store();
        let values = store.distinct("vehicle_type").unwrap();

        assert_eq!(
            values,
            vec![
                Value::String("Mini".to_string()),
                Value::String("Prime Sedan".to_string())
            ]
        );
    }

    #[test]
    fn test_row_count() {
        let store = seed_store();
        assert_eq!(store.row_count().unwrap(), 3);
    }
}
