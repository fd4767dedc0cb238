//! Derived per-column features.
//!
//! For a base column `c` the augmenter appends, in this order:
//!
//! | column | definition | null prefix |
//! |---|---|---|
//! | `c_mom_pct` | `(c[t] / c[t-1] - 1) * 100` | 1 row |
//! | `c_yoy_pct` | `(c[t] / c[t-12] - 1) * 100` | 12 rows |
//! | `c_roll3` | mean of `c[t-2..=t]` | 2 rows |
//! | `c_roll6` | mean of `c[t-5..=t]` | 5 rows |
//!
//! A zero or missing lag value gives null rather than an error or infinity.

use crate::error::{FeatureError, Result};
use macrowatch_data::frame::DATE_COLUMN;
use polars::prelude::*;

/// One derived feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Month-over-month percentage change
    MomPct,
    /// Year-over-year percentage change
    YoyPct,
    /// Three-month rolling mean
    Roll3,
    /// Six-month rolling mean
    Roll6,
}

impl FeatureKind {
    /// All features, in column order.
    pub const ALL: [Self; 4] = [Self::MomPct, Self::YoyPct, Self::Roll3, Self::Roll6];

    /// Column name suffix.
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::MomPct => "mom_pct",
            Self::YoyPct => "yoy_pct",
            Self::Roll3 => "roll3",
            Self::Roll6 => "roll6",
        }
    }

    /// Output column name for `base`.
    pub fn column_name(&self, base: &str) -> String {
        format!("{}_{}", base, self.suffix())
    }

    /// Number of leading rows that are always null.
    pub const fn null_prefix(&self) -> usize {
        match self {
            Self::MomPct => 1,
            Self::YoyPct => 12,
            Self::Roll3 => 2,
            Self::Roll6 => 5,
        }
    }

    /// Expression computing the feature from `base` (rows must be in date
    /// order).
    pub fn expr(&self, base: &str) -> Expr {
        let value = col(base).cast(DataType::Float64);
        let expr = match self {
            Self::MomPct => pct_change(value, 1),
            Self::YoyPct => pct_change(value, 12),
            Self::Roll3 => rolling_mean(value, 3),
            Self::Roll6 => rolling_mean(value, 6),
        };
        expr.alias(self.column_name(base))
    }
}

fn pct_change(value: Expr, lag: i64) -> Expr {
    let lagged = value.clone().shift(lit(lag));
    when(lagged.clone().neq(lit(0.0)))
        .then((value / lagged - lit(1.0)) * lit(100.0))
        .otherwise(lit(NULL))
}

fn rolling_mean(value: Expr, window: usize) -> Expr {
    value.rolling_mean(RollingOptionsFixedWindow {
        window_size: window,
        min_periods: window,
        ..Default::default()
    })
}

/// Append the four derived columns for `base`.
///
/// Rows are sorted by `date` first. Existing columns with the same names are
/// replaced, so applying this twice gives the same frame.
pub fn add_features(data: LazyFrame, base: &str) -> Result<LazyFrame> {
    let mut data = data;
    let schema = data.collect_schema()?;
    if !schema.contains(base) {
        return Err(FeatureError::MissingColumn(base.to_string()));
    }

    let exprs: Vec<Expr> = FeatureKind::ALL.iter().map(|kind| kind.expr(base)).collect();
    Ok(data
        .sort([DATE_COLUMN], Default::default())
        .with_columns(exprs))
}

/// Apply [`add_features`] to every column in `bases`, in order.
pub fn augment_all(df: DataFrame, bases: &[&str]) -> Result<DataFrame> {
    let mut data = df.lazy();
    for base in bases {
        data = add_features(data, base)?;
    }
    Ok(data.collect()?)
}
