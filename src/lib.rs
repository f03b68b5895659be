//! Ridesight: SQL-Driven Ride-Hailing Analytics Dashboard
//!
//! Loads a CSV of ride-hailing trip records into a single SQLite table and
//! serves a fixed catalog of analytical queries plus ad-hoc filtering over
//! HTTP, with derived in-memory aggregations for charting.
//!
//! # Features
//!
//! - **CSV Loading**: header normalization, drop/recreate replace semantics
//! - **Query Catalog**: ten fixed read-only analytical statements
//! - **Filter Builder**: dynamic WHERE composition with bound parameters
//! - **Derived Aggregations**: in-memory count-by and mean-by for bar charts
//! - **HTTP API**: axum server with an embedded single-page dashboard
//!
//! # Example
//!
//! ```no_run
//! use ridesight::ingest::load_csv_reader;
//! use ridesight::query::{run_analysis, Analysis};
//! use ridesight::store::RideStore;
//!
//! let store = RideStore::open_in_memory().unwrap();
//! let csv = "Booking ID,Customer ID,Booking Status,Booking Value\n\
//!            B1,C1,Success,100\n";
//! load_csv_reader(&store, csv.as_bytes()).unwrap();
//!
//! let result = run_analysis(&store, Analysis::TotalBookingValue).unwrap();
//! println!("Results: {:?}", result);
//! ```

pub mod api;
pub mod data;
pub mod ingest;
pub mod query;
pub mod store;

// Re-export commonly used types
pub use data::Value;
pub use query::{run_analysis, run_filter, Analysis, FilterSelection, QueryError};
pub use store::{QueryResult, RideStore, StoreError};
