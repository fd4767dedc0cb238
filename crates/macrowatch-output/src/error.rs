//! Error types for report rendering.

use thiserror::Error;

/// Result type for reporting operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while rendering reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Workbook writer error
    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// PDF writer error
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Chart drawing error
    #[error("Chart error: {0}")]
    Chart(String),

    /// CSV serialization error
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required column is missing or has the wrong content
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A table that must have rows is empty
    #[error("Table is empty: {0}")]
    EmptyTable(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
