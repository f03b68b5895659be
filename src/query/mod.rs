pub mod catalog;
pub mod derived;
pub mod filter;

pub use catalog::{Analysis, ChartHint, ParseAnalysisError};
pub use filter::{DateRange, FilterQuery, FilterSelection};

use crate::store::{QueryResult, RideStore, StoreError};

/// Run a catalog analysis against the store
pub fn run_analysis(store: &RideStore, analysis: Analysis) -> Result<QueryResult, StoreError> {
    store.query(analysis.sql(), &[])
}

/// Build and run a filtered-view query against the store
///
/// Reads the loaded schema first so constraints on missing columns are
/// skipped instead of failing.
pub fn run_filter(
    store: &RideStore,
    selection: &FilterSelection,
) -> Result<QueryResult, StoreError> {
    let columns = store.columns()?;
    let query = selection.build(&columns);
    store.query(&query.sql, &query.params)
}

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Analysis(#[from] ParseAnalysisError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
