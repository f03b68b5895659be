//! Derived aggregations for visualization
//!
//! Computed in memory from an already-filtered result set, not via SQL.
//! Pure functions: empty input produces an empty grouped table.

use crate::data::Value;
use crate::store::QueryResult;
use std::collections::BTreeMap;

/// Count of rows grouped by a key column
///
/// Output columns: the key column and `count`. Rows with a NULL key are
/// skipped. A missing key column yields an empty grouped table.
pub fn count_by(result: &QueryResult, key_column: &str) -> QueryResult {
    let columns = vec![key_column.to_string(), "count".to_string()];

    let Some(key_idx) = result.column_index(key_column) else {
        return grouped(columns, Vec::new());
    };

    let mut groups: BTreeMap<Value, i64> = BTreeMap::new();
    for row in &result.rows {
        let key = &row[key_idx];
        if key.is_null() {
            continue;
        }
        *groups.entry(key.clone()).or_insert(0) += 1;
    }

    let rows = groups
        .into_iter()
        .map(|(key, count)| vec![key, Value::Int64(count)])
        .collect();
    grouped(columns, rows)
}

/// Mean of a numeric column grouped by a key column
///
/// Output columns: the key column and `avg_<value_column>`. Non-numeric and
/// NULL values are skipped; a group with no numeric values is omitted.
pub fn mean_by(result: &QueryResult, key_column: &str, value_column: &str) -> QueryResult {
    let columns = vec![
        key_column.to_string(),
        format!("avg_{}", value_column),
    ];

    let (Some(key_idx), Some(value_idx)) = (
        result.column_index(key_column),
        result.column_index(value_column),
    ) else {
        return grouped(columns, Vec::new());
    };

    let mut groups: BTreeMap<Value, (f64, i64)> = BTreeMap::new();
    for row in &result.rows {
        let key = &row[key_idx];
        if key.is_null() {
            continue;
        }
        if let Some(v) = row[value_idx].as_f64() {
            let entry = groups.entry(key.clone()).or_insert((0.0, 0));
            entry.0 += v;
            entry.1 += 1;
        }
    }

    let rows = groups
        .into_iter()
        .map(|(key, (sum, count))| vec![key, Value::Float64(sum / count as f64)])
        .collect();
    grouped(columns, rows)
}

fn grouped(columns: Vec<String>, rows: Vec<Vec<Value>>) -> QueryResult {
    QueryResult {
        columns,
        rows,
        execution_time_ms: 0,
    }
}
