//! Monthly frequency normalization.
//!
//! Every series is brought to month-start dates before it is merged. Stock-like
//! series (price levels, rates published monthly) keep the last observation of
//! the month; daily rate series are averaged.

use crate::error::{FeatureError, Result};
use chrono::{Datelike, Months, NaiveDate};
use macrowatch_data::RawSeries;
use macrowatch_data::frame::date_column;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// How observations within one month collapse into a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Last observation of the month
    Last,
    /// Arithmetic mean of the month's observations
    Mean,
}

impl Aggregation {
    /// Configuration name of the mode.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Last => "last",
            Self::Mean => "mean",
        }
    }

    fn apply(&self, values: &[f64]) -> Option<f64> {
        match self {
            Self::Last => values.last().copied(),
            Self::Mean if values.is_empty() => None,
            Self::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
        }
    }
}

impl FromStr for Aggregation {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "last" => Ok(Self::Last),
            "mean" => Ok(Self::Mean),
            other => Err(FeatureError::InvalidAggregation(other.to_string())),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A series resampled to one row per calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    name: String,
    dates: Vec<NaiveDate>,
    values: Vec<Option<f64>>,
}

impl MonthlySeries {
    /// Series name, used as the value column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Month-start dates, strictly increasing and contiguous.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Aggregated values; `None` for months without observations.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Number of months covered.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series covers no months.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Two-column frame: `date` and the series values under its name.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        DataFrame::new(vec![
            date_column(&self.dates),
            Series::new(self.name.as_str().into(), self.values.clone()).into(),
        ])
    }
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Resample `raw` to month starts.
///
/// The output spans every month from the first to the last observation, both
/// included. Months with no observation are `None`; values are never carried
/// forward.
pub fn normalize_monthly(raw: &RawSeries, aggregation: Aggregation) -> MonthlySeries {
    let mut buckets: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for observation in raw.observations() {
        if let Some(value) = observation.value {
            buckets
                .entry(month_start(observation.date))
                .or_default()
                .push(value);
        }
    }

    let mut dates = Vec::new();
    let mut values = Vec::new();
    if let (Some(first), Some(last)) = (raw.first_date(), raw.last_date()) {
        let end = month_start(last);
        let mut month = month_start(first);
        while month <= end {
            let value = buckets
                .get(&month)
                .and_then(|bucket| aggregation.apply(bucket));
            dates.push(month);
            values.push(value);
            match month.checked_add_months(Months::new(1)) {
                Some(next) => month = next,
                None => break,
            }
        }
    }

    MonthlySeries {
        name: raw.name().to_string(),
        dates,
        values,
    }
}
