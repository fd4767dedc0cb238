//! Column standardization.

use ndarray::Array1;

/// Input columns and the z-score column each one produces, in summation order.
pub const STANDARDIZED_COLUMNS: [(&str, &str); 4] = [
    ("us_cpi_yoy_pct", "z_cpi"),
    ("us_unrate", "z_unrate"),
    ("us_fedfunds", "z_fedfunds"),
    ("us_10y", "z_10y"),
];

/// z-score every value against the mean and sample standard deviation
/// (ddof = 1) of the non-null values.
///
/// Nulls stay null. With fewer than two values, or no spread at all, the
/// score is undefined and every entry is `None`.
pub fn standardize(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let present: Array1<f64> = values.iter().flatten().copied().collect();
    if present.len() < 2 {
        return vec![None; values.len()];
    }

    let Some(mean) = present.mean() else {
        return vec![None; values.len()];
    };
    let std = present.std(1.0);
    if !std.is_finite() || std == 0.0 {
        return vec![None; values.len()];
    }

    values
        .iter()
        .map(|value| value.map(|x| (x - mean) / std))
        .collect()
}
