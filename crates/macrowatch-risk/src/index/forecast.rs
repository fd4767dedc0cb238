//! Short-horizon linear trend forecast.
//!
//! An ordinary least-squares line is fitted to the trailing window of the
//! index against `t = 0..w-1` and evaluated at `t = w..w+h-1`. There is no
//! confidence band and no seasonal adjustment.

use chrono::{Datelike, Months, NaiveDate};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fitted line `y = intercept + slope * t`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    /// Change per period
    pub slope: f64,
    /// Value at `t = 0`
    pub intercept: f64,
}

impl LinearTrend {
    /// Least-squares fit of `values` against `0..values.len()`.
    ///
    /// Returns `None` with fewer than two points.
    pub fn fit(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }

        let y = Array1::from(values.to_vec());
        let t = Array1::from_iter((0..values.len()).map(|i| i as f64));
        let t_mean = t.mean()?;
        let y_mean = y.mean()?;

        let t_centered = &t - t_mean;
        let sxx = t_centered.dot(&t_centered);
        let sxy = t_centered.dot(&(&y - y_mean));

        let slope = sxy / sxx;
        Some(Self {
            slope,
            intercept: y_mean - slope * t_mean,
        })
    }

    /// Line value at `t`.
    pub fn at(&self, t: f64) -> f64 {
        self.intercept + self.slope * t
    }

    /// Values at `start..start + horizon`.
    pub fn project(&self, start: usize, horizon: usize) -> Vec<f64> {
        (start..start + horizon).map(|t| self.at(t as f64)).collect()
    }
}

/// Projected index values for the months following the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Future month starts
    pub dates: Vec<NaiveDate>,
    /// Projected index values
    pub values: Vec<f64>,
    /// Line the projection came from
    pub trend: LinearTrend,
}

impl Forecast {
    /// Fit the trailing `window` values of `history` and project `horizon`
    /// months past `last_date`.
    ///
    /// Returns `None` when fewer than two points are available.
    pub fn from_history(
        history: &[f64],
        last_date: NaiveDate,
        window: usize,
        horizon: usize,
    ) -> Option<Self> {
        let tail = &history[history.len().saturating_sub(window)..];
        let trend = LinearTrend::fit(tail)?;

        let values = trend.project(tail.len(), horizon);
        let dates = (1..=horizon)
            .map(|k| next_month_start(last_date, k))
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            dates,
            values,
            trend,
        })
    }

    /// Last projected value minus the first, when there are at least two.
    pub fn delta(&self) -> Option<f64> {
        match (self.values.first(), self.values.last()) {
            (Some(first), Some(last)) if self.values.len() >= 2 => Some(last - first),
            _ => None,
        }
    }

    /// Direction of the projection; `None` with fewer than two points.
    pub fn direction(&self, threshold: f64) -> Option<TrendDirection> {
        self.delta()
            .map(|delta| TrendDirection::classify(delta, threshold))
    }
}

fn next_month_start(date: NaiveDate, months: usize) -> Option<NaiveDate> {
    let start = date.with_day(1)?;
    start.checked_add_months(Months::new(u32::try_from(months).ok()?))
}

/// Direction of the projected index over the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendDirection {
    /// Delta above the threshold
    Increasing,
    /// Delta below minus the threshold
    Decreasing,
    /// Within the threshold band
    Stable,
}

impl TrendDirection {
    /// Classify a forecast delta.
    pub fn classify(delta: f64, threshold: f64) -> Self {
        if delta > threshold {
            Self::Increasing
        } else if delta < -threshold {
            Self::Decreasing
        } else {
            Self::Stable
        }
    }

    /// Label used in reports.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Increasing => "INCREASING",
            Self::Decreasing => "DECREASING",
            Self::Stable => "STABLE",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_perfect_line() {
        let history: Vec<f64> = (0..24_i32).map(f64::from).collect();
        let forecast = Forecast::from_history(&history, day(2023, 12, 1), 24, 3).unwrap();

        assert_eq!(forecast.values.len(), 3);
        assert_relative_eq!(forecast.values[0], 24.0, epsilon = 1e-9);
        assert_relative_eq!(forecast.values[1], 25.0, epsilon = 1e-9);
        assert_relative_eq!(forecast.values[2], 26.0, epsilon = 1e-9);
        assert_eq!(
            forecast.dates,
            vec![day(2024, 1, 1), day(2024, 2, 1), day(2024, 3, 1)]
        );
    }

    #[test]
    fn test_uses_trailing_window_only() {
        // Flat history followed by a 24-month ramp: only the ramp is fitted.
        let mut history = vec![100.0; 10];
        history.extend((0..24_i32).map(f64::from));
        let forecast = Forecast::from_history(&history, day(2020, 6, 1), 24, 3).unwrap();
        assert_relative_eq!(forecast.trend.slope, 1.0, epsilon = 1e-9);
        assert_relative_eq!(forecast.values[0], 24.0, epsilon = 1e-9);
    }

    #[test]
    fn test_short_history() {
        let forecast = Forecast::from_history(&[1.0, 3.0], day(2024, 1, 1), 24, 3).unwrap();
        assert_relative_eq!(forecast.trend.slope, 2.0, epsilon = 1e-12);
        assert_relative_eq!(forecast.values[0], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_too_few_points() {
        assert!(Forecast::from_history(&[1.0], day(2024, 1, 1), 24, 3).is_none());
        assert!(Forecast::from_history(&[], day(2024, 1, 1), 24, 3).is_none());
        assert!(LinearTrend::fit(&[2.0]).is_none());
    }

    #[test]
    fn test_dates_from_mid_month() {
        let forecast = Forecast::from_history(&[0.0, 1.0], day(2024, 11, 15), 24, 3).unwrap();
        assert_eq!(
            forecast.dates,
            vec![day(2024, 12, 1), day(2025, 1, 1), day(2025, 2, 1)]
        );
    }

    #[test]
    fn test_delta_and_direction() {
        let history: Vec<f64> = (0..24_i32).map(|i| f64::from(i) * 0.1).collect();
        let forecast = Forecast::from_history(&history, day(2024, 1, 1), 24, 3).unwrap();
        assert_relative_eq!(forecast.delta().unwrap(), 0.2, epsilon = 1e-9);
        assert_eq!(forecast.direction(0.15), Some(TrendDirection::Increasing));
        assert_eq!(forecast.direction(0.25), Some(TrendDirection::Stable));

        let single = Forecast::from_history(&history, day(2024, 1, 1), 24, 1).unwrap();
        assert_eq!(single.direction(0.15), None);
    }

    #[rstest]
    #[case(0.16, TrendDirection::Increasing)]
    #[case(0.15, TrendDirection::Stable)]
    #[case(0.0, TrendDirection::Stable)]
    #[case(-0.15, TrendDirection::Stable)]
    #[case(-0.16, TrendDirection::Decreasing)]
    fn test_classify_direction(#[case] delta: f64, #[case] expected: TrendDirection) {
        assert_eq!(TrendDirection::classify(delta, 0.15), expected);
    }
}
