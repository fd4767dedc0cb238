#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/macrowatch/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod pipeline;

// Re-export main types from sub-crates
pub use macrowatch_data as data;
pub use macrowatch_features as features;
pub use macrowatch_output as output;
pub use macrowatch_risk as risk;

pub use config::{API_KEY_VAR, IndexSettings, PipelineConfig};
pub use error::{ErrorCategory, PipelineError, Result};
pub use pipeline::{Pipeline, Stage, latest_risk_summary};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
