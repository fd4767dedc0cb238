//! Pipeline error type and its coarse categories.

use macrowatch_data::DataError;
use macrowatch_features::FeatureError;
use macrowatch_output::ReportError;
use macrowatch_risk::IndexError;
use std::fmt;
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Coarse classification used in logs and exit messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Missing credential, invalid aggregation mode, bad config file
    Configuration,
    /// Non-success HTTP status or transport failure
    Upstream,
    /// Body or table that cannot be interpreted
    DataFormat,
    /// Too few complete rows to compute a result
    InsufficientData,
    /// Local artifact could not be read or written
    Io,
}

impl ErrorCategory {
    /// Lower-case name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Upstream => "upstream",
            Self::DataFormat => "data_format",
            Self::InsufficientData => "insufficient_data",
            Self::Io => "io",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by pipeline stages.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fetching or persistence failed
    #[error(transparent)]
    Data(#[from] DataError),

    /// Normalizing, merging or augmenting failed
    #[error(transparent)]
    Feature(#[from] FeatureError),

    /// Stress index construction failed
    #[error(transparent)]
    Index(#[from] IndexError),

    /// A report could not be rendered
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// No stage with this name
    #[error("Unknown stage {0:?}")]
    UnknownStage(String),

    /// A stage failed; the pipeline stopped there
    #[error("stage {stage} failed: {source}")]
    Stage {
        /// Name of the failing stage
        stage: &'static str,
        /// What went wrong
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Category of the underlying failure.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Data(e) => match e {
                DataError::MissingApiKey | DataError::InvalidSeriesId(_) => {
                    ErrorCategory::Configuration
                }
                DataError::Upstream { .. } | DataError::Network(_) => ErrorCategory::Upstream,
                DataError::DataFormat { .. }
                | DataError::Parse(_)
                | DataError::Csv(_)
                | DataError::Polars(_) => ErrorCategory::DataFormat,
                DataError::Database(_) | DataError::MissingArtifact(_) | DataError::Io(_) => {
                    ErrorCategory::Io
                }
            },
            Self::Feature(e) => match e {
                FeatureError::InvalidAggregation(_) => ErrorCategory::Configuration,
                FeatureError::EmptyInput => ErrorCategory::InsufficientData,
                FeatureError::MissingColumn(_) | FeatureError::Polars(_) => {
                    ErrorCategory::DataFormat
                }
            },
            Self::Index(e) => match e {
                IndexError::InsufficientData { .. } => ErrorCategory::InsufficientData,
                IndexError::InvalidParameter(_) => ErrorCategory::Configuration,
                IndexError::MissingColumn(_) | IndexError::Polars(_) => ErrorCategory::DataFormat,
            },
            Self::Report(e) => match e {
                ReportError::EmptyTable(_) => ErrorCategory::InsufficientData,
                ReportError::MissingColumn(_)
                | ReportError::Csv(_)
                | ReportError::Json(_)
                | ReportError::Polars(_) => ErrorCategory::DataFormat,
                ReportError::Workbook(_)
                | ReportError::Pdf(_)
                | ReportError::Chart(_)
                | ReportError::Io(_) => ErrorCategory::Io,
            },
            Self::Polars(_) => ErrorCategory::DataFormat,
            Self::Config(_) | Self::UnknownStage(_) => ErrorCategory::Configuration,
            Self::Stage { source, .. } => source.category(),
        }
    }

    /// Name of the stage that failed, if known.
    pub const fn stage(&self) -> Option<&'static str> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
