//! Raw observation series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single dated observation. `value` is `None` when the source reported a
/// missing-data sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Observation date.
    pub date: NaiveDate,
    /// Observed value, if any.
    pub value: Option<f64>,
}

impl Observation {
    /// Create a new observation.
    pub const fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

/// One named indicator as delivered by the upstream API, after cleaning.
///
/// Invariants: dates are strictly increasing and every value is present.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    name: String,
    observations: Vec<Observation>,
}

impl RawSeries {
    /// Build a cleaned series: null values are dropped, observations are
    /// sorted by date and duplicate dates keep their last occurrence.
    pub fn cleaned(name: impl Into<String>, observations: Vec<Observation>) -> Self {
        let mut kept: Vec<Observation> = observations
            .into_iter()
            .filter(|obs| obs.value.is_some_and(f64::is_finite))
            .collect();
        kept.sort_by_key(|obs| obs.date);

        let mut deduped: Vec<Observation> = Vec::with_capacity(kept.len());
        for obs in kept {
            match deduped.last_mut() {
                Some(last) if last.date == obs.date => *last = obs,
                _ => deduped.push(obs),
            }
        }

        Self {
            name: name.into(),
            observations: deduped,
        }
    }

    /// Rename the series (e.g. from a FRED id to a catalog name).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Series name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Observations in date order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// First observation date.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|obs| obs.date)
    }

    /// Last observation date.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|obs| obs.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_cleaned_sorts_and_drops_nulls() {
        let series = RawSeries::cleaned(
            "us_10y",
            vec![
                Observation::new(date(2024, 1, 3), Some(4.0)),
                Observation::new(date(2024, 1, 1), Some(3.9)),
                Observation::new(date(2024, 1, 2), None),
            ],
        );

        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), Some(date(2024, 1, 1)));
        assert_eq!(series.last_date(), Some(date(2024, 1, 3)));
    }

    #[test]
    fn test_cleaned_dedups_keeping_last() {
        let series = RawSeries::cleaned(
            "us_cpi",
            vec![
                Observation::new(date(2024, 1, 1), Some(1.0)),
                Observation::new(date(2024, 1, 1), Some(2.0)),
                Observation::new(date(2024, 2, 1), Some(3.0)),
            ],
        );

        assert_eq!(series.len(), 2);
        assert_eq!(series.observations()[0].value, Some(2.0));
    }

    #[test]
    fn test_with_name() {
        let series = RawSeries::cleaned("CPIAUCSL", vec![]).with_name("us_cpi");
        assert_eq!(series.name(), "us_cpi");
        assert!(series.is_empty());
    }
}
