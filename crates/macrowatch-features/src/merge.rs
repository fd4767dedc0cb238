//! Merge monthly series onto a common date axis.

use crate::error::{FeatureError, Result};
use crate::normalize::MonthlySeries;
use macrowatch_data::frame::DATE_COLUMN;
use polars::prelude::*;
use tracing::debug;

/// Inner-join `series` on `date`.
///
/// A month survives only when every series has a non-null value for it. The
/// result has `date` followed by one column per series, in input order, sorted
/// by date.
pub fn merge_monthly(series: &[MonthlySeries]) -> Result<DataFrame> {
    let (first, rest) = series.split_first().ok_or(FeatureError::EmptyInput)?;

    let present = |s: &MonthlySeries| -> Result<LazyFrame> {
        Ok(s.to_frame()?
            .lazy()
            .filter(col(s.name()).is_not_null()))
    };

    let mut merged = present(first)?;
    for other in rest {
        merged = merged.join(
            present(other)?,
            [col(DATE_COLUMN)],
            [col(DATE_COLUMN)],
            JoinArgs::new(JoinType::Inner),
        );
    }

    let df = merged
        .sort([DATE_COLUMN], Default::default())
        .collect()?;
    debug!(series = series.len(), rows = df.height(), "merged monthly series");
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{Aggregation, normalize_monthly};
    use chrono::NaiveDate;
    use macrowatch_data::frame::{float_values, str_values};
    use macrowatch_data::{Observation, RawSeries};

    fn monthly(name: &str, points: &[(i32, u32, Option<f64>)]) -> MonthlySeries {
        let observations = points
            .iter()
            .map(|&(y, m, v)| Observation::new(NaiveDate::from_ymd_opt(y, m, 1).unwrap(), v))
            .collect();
        normalize_monthly(&RawSeries::cleaned(name, observations), Aggregation::Last)
    }

    #[test]
    fn test_inner_join_keeps_complete_months() {
        let cpi = monthly(
            "us_cpi",
            &[(2024, 1, Some(300.0)), (2024, 2, Some(301.0)), (2024, 3, Some(302.0))],
        );
        // February missing from the yield series.
        let ten_year = monthly("us_10y", &[(2024, 1, Some(4.0)), (2024, 3, Some(4.2))]);

        let merged = merge_monthly(&[cpi, ten_year]).unwrap();
        assert_eq!(merged.height(), 2);
        assert_eq!(
            str_values(&merged, "date").unwrap(),
            vec![Some("2024-01-01".to_string()), Some("2024-03-01".to_string())]
        );
        assert_eq!(
            float_values(&merged, "us_10y").unwrap(),
            vec![Some(4.0), Some(4.2)]
        );
    }

    #[test]
    fn test_column_order_follows_input() {
        let a = monthly("us_unrate", &[(2024, 1, Some(3.7))]);
        let b = monthly("us_cpi", &[(2024, 1, Some(300.0))]);
        let merged = merge_monthly(&[a, b]).unwrap();
        let names: Vec<&str> = merged
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(names, vec!["date", "us_unrate", "us_cpi"]);
    }

    #[test]
    fn test_disjoint_series_merge_to_empty() {
        let a = monthly("a", &[(2020, 1, Some(1.0))]);
        let b = monthly("b", &[(2021, 1, Some(1.0))]);
        assert_eq!(merge_monthly(&[a, b]).unwrap().height(), 0);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(merge_monthly(&[]), Err(FeatureError::EmptyInput)));
    }
}
