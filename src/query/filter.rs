//! Filter predicate builder
//!
//! Translates the dashboard's filter selections into one SELECT over `rides`.
//! Constraint categories are AND-ed together; values inside a multi-select
//! category are OR-ed via an IN list. Every user-supplied value is a bound
//! parameter, never spliced into the statement text.

use crate::data::Value;
use crate::store::RIDES_TABLE;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An inclusive booking-date interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// User-chosen constraints for the filtered ride view
///
/// An empty multi-select means "no filtering by this field" (the select-all
/// default), never "match nothing". Rebuilt on every interaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    pub vehicle_types: Vec<String>,
    pub booking_statuses: Vec<String>,
    /// May contain nulls when the source data has rides without a payment
    /// method; those entries are dropped before building the IN list.
    pub payment_methods: Vec<Option<String>>,
    pub customer_id: String,
    pub date_range: Option<DateRange>,
}

/// A ready-to-execute statement with its bound parameters
#[derive(Debug, Clone)]
pub struct FilterQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl FilterSelection {
    /// Build the filtered-view statement
    ///
    /// `available_columns` is the loaded table's schema; a constraint whose
    /// column is missing is skipped rather than producing a failing statement.
    /// Predicate order is fixed: vehicle, status, payment, customer id, date.
    pub fn build(&self, available_columns: &[String]) -> FilterQuery {
        let mut predicates: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();
        let has = |name: &str| available_columns.iter().any(|c| c == name);

        if !self.vehicle_types.is_empty() && has("vehicle_type") {
            predicates.push(in_clause("vehicle_type", self.vehicle_types.len()));
            params.extend(self.vehicle_types.iter().cloned().map(Value::String));
        }

        if !self.booking_statuses.is_empty() && has("booking_status") {
            predicates.push(in_clause("booking_status", self.booking_statuses.len()));
            params.extend(self.booking_statuses.iter().cloned().map(Value::String));
        }

        // Nulls cannot appear inside a string IN list; drop them first. A
        // selection of only nulls therefore applies no payment predicate.
        let payments: Vec<&String> = self.payment_methods.iter().flatten().collect();
        if !payments.is_empty() && has("payment_method") {
            predicates.push(in_clause("payment_method", payments.len()));
            params.extend(payments.into_iter().cloned().map(Value::String));
        }

        if !self.customer_id.is_empty() && has("customer_id") {
            predicates.push("customer_id LIKE ?".to_string());
            params.push(Value::String(format!("%{}%", self.customer_id)));
        }

        if let Some(range) = &self.date_range {
            if has("booking_date") {
                predicates.push("booking_date BETWEEN ? AND ?".to_string());
                params.push(Value::String(range.start.format("%Y-%m-%d").to_string()));
                params.push(Value::String(range.end.format("%Y-%m-%d").to_string()));
            }
        }

        let sql = if predicates.is_empty() {
            format!("SELECT * FROM {}", RIDES_TABLE)
        } else {
            format!(
                "SELECT * FROM {} WHERE {}",
                RIDES_TABLE,
                predicates.join(" AND ")
            )
        };

        FilterQuery { sql, params }
    }
}

fn in_clause(column: &str, count: usize) -> String {
    format!("{} IN ({})", column, vec!["?"; count].join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ride_columns() -> Vec<String> {
        [
            "booking_id",
            "customer_id",
            "vehicle_type",
            "booking_status",
            "payment_method",
            "booking_date",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn test_no_filters_selects_all() {
        let selection = FilterSelection::default();
        let query = selection.build(&ride_columns());

        assert_eq!(query.sql, "SELECT * FROM rides");
        assert!(query.params.is_empty());
    }

    #[test]
    fn test_in_list_with_bound_params() {
        let selection = FilterSelection {
            vehicle_types: vec!["Mini".to_string(), "Bike".to_string()],
            ..Default::default()
        };
        let query = selection.build(&ride_columns());

        assert_eq!(
            query.sql,
            "SELECT * FROM rides WHERE vehicle_type IN (?, ?)"
        );
        assert_eq!(
            query.params,
            vec![
                Value::String("Mini".to_string()),
                Value::String("Bike".to_string())
            ]
        );
    }

    #[test]
    fn test_predicate_order_is_fixed() {
        let selection = FilterSelection {
            vehicle_types: vec!["Mini".to_string()],
            booking_statuses: vec!["Success".to_string()],
            payment_methods: vec![Some("UPI".to_string())],
            customer_id: "C1".to_string(),
            date_range: Some(DateRange {
                start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            }),
        };
        let query = selection.build(&ride_columns());

        assert_eq!(
            query.sql,
            "SELECT * FROM rides WHERE vehicle_type IN (?) \
             AND booking_status IN (?) \
             AND payment_method IN (?) \
             AND customer_id LIKE ? \
             AND booking_date BETWEEN ? AND ?"
        );
        assert_eq!(query.params.len(), 6);
        assert_eq!(query.params[3], Value::String("%C1%".to_string()));
        assert_eq!(query.params[4], Value::String("2024-01-01".to_string()));
        assert_eq!(query.params[5], Value::String("2024-01-31".to_string()));
    }

    #[test]
    fn test_null_payment_methods_dropped() {
        let selection = FilterSelection {
            payment_methods: vec![None, Some("Cash".to_string()), None],
            ..Default::default()
        };
        let query = selection.build(&ride_columns());

        assert_eq!(
            query.sql,
            "SELECT * FROM rides WHERE payment_method IN (?)"
        );
        assert_eq!(query.params, vec![Value::String("Cash".to_string())]);
    }

    #[test]
    fn test_all_null_payment_methods_adds_no_predicate() {
        let selection = FilterSelection {
            payment_methods: vec![None, None],
            ..Default::default()
        };
        let query = selection.build(&ride_columns());

        assert_eq!(query.sql, "SELECT * FROM rides");
    }

    #[test]
    fn test_quote_in_value_stays_in_params() {
        let selection = FilterSelection {
            vehicle_types: vec!["O'Neill Special".to_string()],
            ..Default::default()
        };
        let query = selection.build(&ride_columns());

        // The value never appears in the statement text
        assert!(!query.sql.contains("O'Neill"));
        assert_eq!(
            query.params,
            vec![Value::String("O'Neill Special".to_string())]
        );
    }

    #[test]
    fn test_missing_date_column_skips_range() {
        let columns: Vec<String> = vec!["customer_id".to_string(), "vehicle_type".to_string()];
        let selection = FilterSelection {
            date_range: Some(DateRange {
                start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            }),
            customer_id: "C".to_string(),
            ..Default::default()
        };
        let query = selection.build(&columns);

        assert_eq!(query.sql, "SELECT * FROM rides WHERE customer_id LIKE ?");
        assert_eq!(query.params.len(), 1);
    }

    #[test]
    fn test_empty_customer_search_is_no_filter() {
        let selection = FilterSelection {
            customer_id: String::new(),
            ..Default::default()
        };
        let query = selection.build(&ride_columns());

        assert_eq!(query.sql, "SELECT * FROM rides");
    }
}
