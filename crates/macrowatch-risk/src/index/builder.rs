//! Stress index construction over the risk table.

use super::IndexError;
use super::extremes::{bottom_indices, top_indices};
use super::forecast::Forecast;
use super::regime::StressLevel;
use super::standardize::{STANDARDIZED_COLUMNS, standardize};
use macrowatch_data::frame::{DATE_COLUMN, date_column, date_values, float_values, take_rows};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Name of the composite index column.
pub const INDEX_COLUMN: &str = "macro_stress_index";

/// Builder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressIndexConfig {
    /// Trailing months fitted by the forecast (default: 24)
    pub forecast_window: usize,
    /// Months projected past the history (default: 3)
    pub forecast_horizon: usize,
    /// Rows kept in each of the highest/lowest stress lists (default: 10)
    pub top_n: usize,
}

impl Default for StressIndexConfig {
    fn default() -> Self {
        Self {
            forecast_window: 24,
            forecast_horizon: 3,
            top_n: 10,
        }
    }
}

/// Everything the index stage produces.
#[derive(Debug, Clone)]
pub struct StressIndex {
    /// Input rows with a defined composite, plus the z-score, index, level and
    /// strategy columns
    pub table: DataFrame,
    /// Highest-stress rows, descending
    pub top_high: DataFrame,
    /// Lowest-stress rows, ascending
    pub top_low: DataFrame,
    /// Trend projection; `None` when fewer than two rows exist
    pub forecast: Option<Forecast>,
}

impl StressIndex {
    /// Forecast as a `date, macro_stress_index` table (empty without a
    /// forecast).
    pub fn forecast_frame(&self) -> PolarsResult<DataFrame> {
        let (dates, values) = self
            .forecast
            .as_ref()
            .map_or((Vec::new(), Vec::new()), |f| (f.dates.clone(), f.values.clone()));
        DataFrame::new(vec![
            date_column(&dates),
            Series::new(INDEX_COLUMN.into(), values).into(),
        ])
    }

    /// Composite index values of [`Self::table`], in row order.
    pub fn index_values(&self) -> PolarsResult<Vec<f64>> {
        Ok(float_values(&self.table, INDEX_COLUMN)?
            .into_iter()
            .flatten()
            .collect())
    }
}

/// Builds the macro stress index from the risk table.
#[derive(Debug, Clone, Default)]
pub struct StressIndexBuilder {
    config: StressIndexConfig,
}

impl StressIndexBuilder {
    /// Create a builder, rejecting a zero forecast window or horizon.
    pub fn new(config: StressIndexConfig) -> Result<Self, IndexError> {
        if config.forecast_window == 0 {
            return Err(IndexError::InvalidParameter(
                "forecast_window must be positive".to_string(),
            ));
        }
        if config.forecast_horizon == 0 {
            return Err(IndexError::InvalidParameter(
                "forecast_horizon must be positive".to_string(),
            ));
        }
        Ok(Self { config })
    }

    /// Builder parameters.
    pub const fn config(&self) -> &StressIndexConfig {
        &self.config
    }

    /// Build the index.
    ///
    /// Rows are taken in date order. z-scores use the whole input table; rows
    /// whose composite is undefined are then dropped.
    ///
    /// # Errors
    /// - [`IndexError::MissingColumn`] if an indicator column is absent
    /// - [`IndexError::InsufficientData`] if no row has a defined composite
    pub fn build(&self, df: &DataFrame) -> Result<StressIndex, IndexError> {
        for (input, _) in STANDARDIZED_COLUMNS {
            if df.column(input).is_err() {
                return Err(IndexError::MissingColumn(input.to_string()));
            }
        }
        if df.column(DATE_COLUMN).is_err() {
            return Err(IndexError::MissingColumn(DATE_COLUMN.to_string()));
        }

        let df = df.sort([DATE_COLUMN], Default::default())?;

        let mut z_scores = Vec::with_capacity(STANDARDIZED_COLUMNS.len());
        for (input, _) in STANDARDIZED_COLUMNS {
            z_scores.push(standardize(&float_values(&df, input)?));
        }

        let mut kept = Vec::new();
        let mut index = Vec::new();
        for row in 0..df.height() {
            let composite: Option<f64> = z_scores.iter().map(|z| z[row]).sum();
            if let Some(value) = composite {
                kept.push(row);
                index.push(value);
            }
        }
        if kept.is_empty() {
            return Err(IndexError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        debug!(
            input_rows = df.height(),
            kept = kept.len(),
            "dropped rows without a composite index"
        );

        let mut table = take_rows(&df, &kept)?;
        for ((_, output), z) in STANDARDIZED_COLUMNS.iter().zip(&z_scores) {
            let values: Vec<f64> = kept.iter().filter_map(|&row| z[row]).collect();
            table.with_column(Series::new((*output).into(), values))?;
        }
        let levels: Vec<StressLevel> = index.iter().map(|&v| StressLevel::classify(v)).collect();
        table.with_column(Series::new(INDEX_COLUMN.into(), index.clone()))?;
        table.with_column(Series::new(
            "stress_level".into(),
            levels.iter().map(StressLevel::label).collect::<Vec<_>>(),
        ))?;
        table.with_column(Series::new(
            "macro_strategy".into(),
            levels.iter().map(StressLevel::strategy).collect::<Vec<_>>(),
        ))?;

        let top_high = take_rows(&table, &top_indices(&index, self.config.top_n))?;
        let top_low = take_rows(&table, &bottom_indices(&index, self.config.top_n))?;

        let dates = date_values(&table)?;
        let forecast = dates.last().and_then(|&last| {
            Forecast::from_history(
                &index,
                last,
                self.config.forecast_window,
                self.config.forecast_horizon,
            )
        });

        if let Some(latest) = index.last() {
            info!(
                rows = table.height(),
                latest = *latest,
                level = %StressLevel::classify(*latest),
                forecast = forecast.is_some(),
                "built macro stress index"
            );
        }

        Ok(StressIndex {
            table,
            top_high,
            top_low,
            forecast,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use macrowatch_data::frame::str_values;

    /// Four indicator columns over `n` months.
    fn frame(cpi: Vec<Option<f64>>, unrate: Vec<f64>, fed: Vec<f64>, ten: Vec<f64>) -> DataFrame {
        let dates: Vec<String> = (0..unrate.len())
            .map(|i| format!("{:04}-{:02}-01", 2000 + i / 12, i % 12 + 1))
            .collect();
        DataFrame::new(vec![
            Series::new("date".into(), dates).into(),
            Series::new("us_cpi_yoy_pct".into(), cpi).into(),
            Series::new("us_unrate".into(), unrate).into(),
            Series::new("us_fedfunds".into(), fed).into(),
            Series::new("us_10y".into(), ten).into(),
        ])
        .unwrap()
    }

    fn symmetric() -> DataFrame {
        // Each column: mean m, values m - s, m, m + s.
        frame(
            vec![Some(1.0), Some(2.0), Some(3.0)],
            vec![4.0, 5.0, 6.0],
            vec![1.0, 3.0, 5.0],
            vec![3.5, 4.0, 4.5],
        )
    }

    /// Deviations `[+1, +1, -1, -1, 0]` around each column mean: sample std is
    /// exactly 1, rows 0 and 1 sit one std above, row 4 sits on the mean.
    fn unit_spread() -> DataFrame {
        let column = |m: f64| vec![m + 1.0, m + 1.0, m - 1.0, m - 1.0, m];
        frame(
            column(3.0).into_iter().map(Some).collect(),
            column(5.0),
            column(2.0),
            column(4.0),
        )
    }

    #[test]
    fn test_row_at_mean_is_moderate() {
        let index = StressIndexBuilder::default().build(&unit_spread()).unwrap();
        let values = index.index_values().unwrap();
        assert_relative_eq!(values[4], 0.0, epsilon = 1e-12);
        assert_eq!(
            str_values(&index.table, "stress_level").unwrap()[4].as_deref(),
            Some("MODERATE")
        );
        assert_eq!(
            str_values(&index.table, "macro_strategy").unwrap()[4].as_deref(),
            Some("Rising stress: Rotate into Quality sectors")
        );
    }

    #[test]
    fn test_row_one_std_above_is_critical() {
        let index = StressIndexBuilder::default().build(&unit_spread()).unwrap();
        let values = index.index_values().unwrap();
        assert_relative_eq!(values[0], 4.0, epsilon = 1e-9);
        assert_relative_eq!(values[2], -4.0, epsilon = 1e-9);

        let levels = str_values(&index.table, "stress_level").unwrap();
        assert_eq!(levels[0].as_deref(), Some("CRITICAL"));
        assert_eq!(levels[2].as_deref(), Some("VERY LOW"));
    }

    #[test]
    fn test_null_rows_dropped_after_standardizing() {
        let df = frame(
            vec![None, Some(1.0), Some(2.0), Some(3.0)],
            vec![9.0, 4.0, 5.0, 6.0],
            vec![9.0, 1.0, 3.0, 5.0],
            vec![9.0, 3.5, 4.0, 4.5],
        );
        let index = StressIndexBuilder::default().build(&df).unwrap();
        assert_eq!(index.table.height(), 3);
        assert_eq!(
            str_values(&index.table, "date").unwrap()[0].as_deref(),
            Some("2000-02-01")
        );
        // The dropped row still counts toward the other columns' statistics.
        let z_unrate = float_values(&index.table, "z_unrate").unwrap();
        assert!(z_unrate[1].unwrap() < 0.0);
    }

    #[test]
    fn test_output_columns() {
        let index = StressIndexBuilder::default().build(&symmetric()).unwrap();
        let names: Vec<&str> = index
            .table
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(
            &names[5..],
            &[
                "z_cpi",
                "z_unrate",
                "z_fedfunds",
                "z_10y",
                "macro_stress_index",
                "stress_level",
                "macro_strategy"
            ]
        );
    }

    #[test]
    fn test_top_and_bottom_lists() {
        let n = 30;
        let ramp: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let df = frame(
            ramp.iter().copied().map(Some).collect(),
            ramp.clone(),
            ramp.clone(),
            ramp.clone(),
        );
        let index = StressIndexBuilder::default().build(&df).unwrap();

        let high = float_values(&index.top_high, INDEX_COLUMN).unwrap();
        let low = float_values(&index.top_low, INDEX_COLUMN).unwrap();
        assert_eq!(high.len(), 10);
        assert_eq!(low.len(), 10);
        assert!(high.windows(2).all(|w| w[0] >= w[1]));
        assert!(low.windows(2).all(|w| w[0] <= w[1]));
        // Lowest of the top list is above the highest of the bottom list.
        assert!(high[9].unwrap() > low[9].unwrap());
    }

    #[test]
    fn test_short_table_lists_all_rows() {
        let index = StressIndexBuilder::default().build(&symmetric()).unwrap();
        assert_eq!(index.top_high.height(), 3);
        assert_eq!(index.top_low.height(), 3);
    }

    #[test]
    fn test_forecast_produced() {
        let index = StressIndexBuilder::default().build(&symmetric()).unwrap();
        let forecast = index.forecast.as_ref().unwrap();
        assert_eq!(forecast.values.len(), 3);
        let frame = index.forecast_frame().unwrap();
        assert_eq!(frame.height(), 3);
        assert_eq!(
            str_values(&frame, "date").unwrap()[0].as_deref(),
            Some("2000-04-01")
        );
    }

    #[test]
    fn test_no_complete_rows() {
        let df = frame(
            vec![None, None, None],
            vec![1.0, 2.0, 3.0],
            vec![1.0, 2.0, 3.0],
            vec![1.0, 2.0, 3.0],
        );
        let result = StressIndexBuilder::default().build(&df);
        assert!(matches!(result, Err(IndexError::InsufficientData { .. })));
    }

    #[test]
    fn test_missing_column() {
        let df = symmetric().drop("us_10y").unwrap();
        let result = StressIndexBuilder::default().build(&df);
        assert!(matches!(result, Err(IndexError::MissingColumn(c)) if c == "us_10y"));
    }

    #[test]
    fn test_invalid_config() {
        let config = StressIndexConfig {
            forecast_window: 0,
            ..Default::default()
        };
        assert!(StressIndexBuilder::new(config).is_err());
    }
}
