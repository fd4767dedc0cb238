//! Error types for data operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// No FRED credential was configured
    #[error("FRED_API_KEY is not configured; set it in the environment or in a .env file")]
    MissingApiKey,

    /// Invalid series identifier
    #[error("Invalid series identifier: {0:?}")]
    InvalidSeriesId(String),

    /// Upstream API answered with a non-success status
    #[error("FRED request for {series_id} failed with HTTP {status}")]
    Upstream {
        /// Series that was requested
        series_id: String,
        /// HTTP status code
        status: u16,
    },

    /// Response body could not be turned into observations
    #[error("Unexpected FRED response for {series_id}: {reason}")]
    DataFormat {
        /// Series that was requested
        series_id: String,
        /// What was wrong with the body
        reason: String,
    },

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// An upstream artifact has not been produced yet
    #[error("Missing artifact: {}", .0.display())]
    MissingArtifact(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
