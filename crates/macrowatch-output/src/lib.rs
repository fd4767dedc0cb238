#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/macrowatch/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod brief;
pub mod chart;
pub mod error;
pub mod export;
pub mod pdf;
pub mod summary;
pub mod workbook;

pub use brief::{ExecutiveBrief, StressPeriod, percentile_rank};
pub use chart::{
    FULL_CHART, IndexPoint, RECENT_CHART, render_index_chart, render_index_charts, trailing_years,
};
pub use error::{ReportError, Result};
pub use export::{ExportFormat, Exporter};
pub use summary::RiskSummary;
pub use workbook::{WorkbookInputs, current_regime, write_workbook};

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
