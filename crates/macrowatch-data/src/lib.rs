#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/macrowatch/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod frame;
pub mod fred;
pub mod series;
pub mod store;

pub use error::{DataError, Result};
pub use fred::{FredClient, SeriesSpec, default_catalog, parse_observations};
pub use series::{Observation, RawSeries};
pub use store::{SqliteStore, read_raw_series, read_table, write_raw_series, write_table};

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
