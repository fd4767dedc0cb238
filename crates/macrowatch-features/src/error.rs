//! Error types for feature construction.

use thiserror::Error;

/// Result type for feature operations.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Errors raised while normalizing, merging or augmenting series.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Aggregation mode other than `last` or `mean`
    #[error("Invalid aggregation mode {0:?}: expected \"last\" or \"mean\"")]
    InvalidAggregation(String),

    /// A base column is not present in the table
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Nothing to merge
    #[error("No series to merge")]
    EmptyInput,

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
