//! Executive brief: the handful of figures the one-page report is built from.

use crate::error::{ReportError, Result};
use chrono::NaiveDate;
use macrowatch_data::frame::{date_values, float_values, str_values};
use macrowatch_risk::{INDEX_COLUMN, TrendDirection};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Number of historical stress months quoted in the brief.
pub const TOP_PERIODS: usize = 3;

/// One historical month and its index value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressPeriod {
    /// Month start
    pub date: NaiveDate,
    /// Composite stress index
    pub macro_stress_index: f64,
}

impl StressPeriod {
    /// Text used in the brief, e.g. `2022-10-01 (Index 4.12)`.
    pub fn describe(&self) -> String {
        format!("{} (Index {:.2})", self.date, self.macro_stress_index)
    }
}

/// Figures shown in the executive brief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveBrief {
    /// Date of the latest index row
    pub report_date: NaiveDate,
    /// Latest composite index
    pub macro_stress_index: f64,
    /// Latest stress level label
    pub stress_level: String,
    /// Share of history strictly below the latest value, in percent
    pub percentile: f64,
    /// Direction of the forecast; `None` without at least two forecast rows
    pub forecast_trend: Option<TrendDirection>,
    /// Last forecast value minus the first (0 without a trend)
    pub forecast_delta: f64,
    /// Strategy for the latest regime
    pub strategy: String,
    /// Highest-stress historical months, highest first
    pub top_periods: Vec<StressPeriod>,
}

impl ExecutiveBrief {
    /// Assemble the brief from the index table and the optional forecast and
    /// top-stress tables.
    ///
    /// # Errors
    /// [`ReportError::EmptyTable`] if the index table has no row with an index
    /// value.
    pub fn from_tables(
        index: &DataFrame,
        forecast: Option<&DataFrame>,
        top_high: Option<&DataFrame>,
        trend_threshold: f64,
    ) -> Result<Self> {
        let dates = date_values(index)?;
        let values = float_values(index, INDEX_COLUMN)
            .map_err(|_| ReportError::MissingColumn(INDEX_COLUMN.to_string()))?;
        let levels = str_values(index, "stress_level")
            .map_err(|_| ReportError::MissingColumn("stress_level".to_string()))?;
        let strategies = if index.column("macro_strategy").is_ok() {
            str_values(index, "macro_strategy")?
        } else {
            vec![None; index.height()]
        };

        let mut rows: Vec<(NaiveDate, f64, usize)> = dates
            .iter()
            .zip(&values)
            .enumerate()
            .filter_map(|(row, (&date, value))| value.map(|v| (date, v, row)))
            .collect();
        rows.sort_by_key(|&(date, _, _)| date);

        let &(report_date, latest, row) = rows
            .last()
            .ok_or_else(|| ReportError::EmptyTable("stress index".to_string()))?;
        let history: Vec<f64> = rows.iter().map(|&(_, v, _)| v).collect();

        let (forecast_trend, forecast_delta) = match forecast {
            Some(fc) => {
                let projected: Vec<f64> = float_values(fc, INDEX_COLUMN)?
                    .into_iter()
                    .flatten()
                    .collect();
                match (projected.first(), projected.last()) {
                    (Some(first), Some(last)) if projected.len() >= 2 => {
                        let delta = last - first;
                        (Some(TrendDirection::classify(delta, trend_threshold)), delta)
                    }
                    _ => (None, 0.0),
                }
            }
            None => (None, 0.0),
        };

        let top_periods = match top_high {
            Some(top) => top_periods(top)?,
            None => Vec::new(),
        };

        Ok(Self {
            report_date,
            macro_stress_index: latest,
            stress_level: levels[row].clone().unwrap_or_default(),
            percentile: percentile_rank(&history, latest),
            forecast_trend,
            forecast_delta,
            strategy: strategies[row].clone().unwrap_or_else(|| "N/A".to_string()),
            top_periods,
        })
    }

    /// Forecast line, e.g. `INCREASING (delta +0.42)`.
    pub fn trend_text(&self) -> String {
        let label = self
            .forecast_trend
            .as_ref()
            .map_or("N/A", TrendDirection::label);
        format!("{} (delta {:+.2})", label, self.forecast_delta)
    }

    /// Percentile line, e.g. `87th (higher = more stress)`.
    pub fn percentile_text(&self) -> String {
        format!("{:.0}th (higher = more stress)", self.percentile)
    }
}

/// Percentage of `history` strictly below `value`.
pub fn percentile_rank(history: &[f64], value: f64) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    let below = history.iter().filter(|&&v| v < value).count();
    below as f64 / history.len() as f64 * 100.0
}

fn top_periods(top: &DataFrame) -> Result<Vec<StressPeriod>> {
    let dates = date_values(top)?;
    let values = float_values(top, INDEX_COLUMN)?;
    let mut periods: Vec<StressPeriod> = dates
        .into_iter()
        .zip(values)
        .filter_map(|(date, value)| {
            value.map(|macro_stress_index| StressPeriod {
                date,
                macro_stress_index,
            })
        })
        .collect();
    periods.sort_by(|a, b| b.macro_stress_index.total_cmp(&a.macro_stress_index));
    periods.truncate(TOP_PERIODS);
    Ok(periods)
}
