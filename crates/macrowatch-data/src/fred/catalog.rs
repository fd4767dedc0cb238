//! Series catalog: which FRED series feed the pipeline and how each one is
//! brought to a monthly cadence.

use serde::{Deserialize, Serialize};

/// One configured input series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSpec {
    /// Local name, also the column name in the merged table (e.g. `us_cpi`).
    pub name: String,
    /// FRED series identifier (e.g. `CPIAUCSL`).
    pub series_id: String,
    /// Monthly aggregation mode: `last` or `mean`.
    pub aggregation: String,
}

impl SeriesSpec {
    /// Create a new series spec.
    pub fn new(
        name: impl Into<String>,
        series_id: impl Into<String>,
        aggregation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            series_id: series_id.into(),
            aggregation: aggregation.into(),
        }
    }
}

/// The four US series the stress index is built from.
///
/// CPI, unemployment and fed funds are already monthly and keep their last
/// value; the daily 10-year yield is averaged over the month.
pub fn default_catalog() -> Vec<SeriesSpec> {
    vec![
        SeriesSpec::new("us_cpi", "CPIAUCSL", "last"),
        SeriesSpec::new("us_unrate", "UNRATE", "last"),
        SeriesSpec::new("us_fedfunds", "FEDFUNDS", "last"),
        SeriesSpec::new("us_10y", "DGS10", "mean"),
    ]
}
