#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/macrowatch/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod index;
pub mod rules;

pub use index::{
    Forecast, INDEX_COLUMN, IndexError, LinearTrend, StressIndex, StressIndexBuilder,
    StressIndexConfig, StressLevel, TrendDirection, strategy_for_label,
};
pub use rules::{RiskAssessment, RiskInputs, RiskLevel, RiskRule, classify_frame};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
