#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/macrowatch/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod augment;
pub mod error;
pub mod merge;
pub mod normalize;

pub use augment::{FeatureKind, add_features, augment_all};
pub use error::{FeatureError, Result};
pub use merge::merge_monthly;
pub use normalize::{Aggregation, MonthlySeries, normalize_monthly};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
