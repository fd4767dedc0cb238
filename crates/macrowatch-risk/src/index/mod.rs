//! Composite macro stress index.
//!
//! Four indicators are standardized over their full history, summed into one
//! index per month, banded into a regime with a strategy attached, and
//! extrapolated a few months ahead with a least-squares trend.

pub mod builder;
pub mod extremes;
pub mod forecast;
pub mod regime;
pub mod standardize;

pub use builder::{INDEX_COLUMN, StressIndex, StressIndexBuilder, StressIndexConfig};
pub use extremes::{bottom_indices, top_indices};
pub use forecast::{Forecast, LinearTrend, TrendDirection};
pub use regime::{StressLevel, strategy_for_label};
pub use standardize::{STANDARDIZED_COLUMNS, standardize};

use thiserror::Error;

/// Errors raised while building the stress index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Not enough rows to build the index
    #[error("Insufficient data: need at least {required} complete rows, got {actual}")]
    InsufficientData {
        /// Required number of rows
        required: usize,
        /// Rows actually available
        actual: usize,
    },

    /// An input column is missing
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Invalid builder parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
