//! Typed column access for pipeline tables.
//!
//! Tables travel between stages as CSV, so column dtypes are whatever the
//! reader inferred (an all-empty float column comes back as strings). These
//! helpers cast before extracting so callers always get the type they expect.

use chrono::NaiveDate;
use polars::prelude::*;

/// Name of the date column shared by every table.
pub const DATE_COLUMN: &str = "date";

/// ISO format used for the date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Read a column as `f64` values.
pub fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

/// Read a column as `i64` values.
pub fn int_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<i64>>> {
    let column = df.column(name)?.cast(&DataType::Int64)?;
    Ok(column.i64()?.into_iter().collect())
}

/// Read a column as owned strings.
pub fn str_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// Read the `date` column as calendar dates.
pub fn date_values(df: &DataFrame) -> PolarsResult<Vec<NaiveDate>> {
    str_values(df, DATE_COLUMN)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            let raw = value.ok_or_else(|| {
                PolarsError::ComputeError(format!("null date at row {}", row).into())
            })?;
            // Tolerate a time suffix such as "2024-01-01 00:00:00".
            let day = raw.get(..10).unwrap_or(raw.as_str());
            NaiveDate::parse_from_str(day, DATE_FORMAT).map_err(|e| {
                PolarsError::ComputeError(format!("invalid date {:?}: {}", raw, e).into())
            })
        })
        .collect()
}

/// Format dates for the `date` column.
pub fn format_dates(dates: &[NaiveDate]) -> Vec<String> {
    dates
        .iter()
        .map(|date| date.format(DATE_FORMAT).to_string())
        .collect()
}

/// Build a `date` column from calendar dates.
pub fn date_column(dates: &[NaiveDate]) -> Column {
    Series::new(DATE_COLUMN.into(), format_dates(dates)).into()
}

/// Rows at the given positions, in the given order.
pub fn take_rows(df: &DataFrame, rows: &[usize]) -> PolarsResult<DataFrame> {
    let indices: Vec<IdxSize> = rows.iter().map(|&row| row as IdxSize).collect();
    df.take(&IdxCa::from_vec("idx".into(), indices))
}

/// The most recent row by `date` (empty frame in, empty frame out).
pub fn latest_row(df: &DataFrame) -> PolarsResult<DataFrame> {
    Ok(df.sort([DATE_COLUMN], Default::default())?.tail(Some(1)))
}
