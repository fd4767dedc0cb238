//! Score a monthly feature table and build the macro stress index from it.
//!
//! Pass the path of a monthly table CSV (for example
//! `data/processed/macro_us_monthly.csv`) to use real data; without an
//! argument a synthetic six-year table is used.

use chrono::{Months, NaiveDate};
use macrowatch_data::frame::{date_values, float_values, str_values};
use macrowatch_data::read_table;
use macrowatch_risk::{INDEX_COLUMN, StressIndexBuilder, classify_frame};
use polars::prelude::*;
use std::path::PathBuf;

fn synthetic_table(months: u32) -> PolarsResult<DataFrame> {
    let start = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
    let dates: Vec<String> = (0..months)
        .map(|i| start.checked_add_months(Months::new(i)).unwrap().to_string())
        .collect();
    let wave = |period: f64, scale: f64, base: f64| -> Vec<f64> {
        (0..months)
            .map(|i| base + scale * (f64::from(i) * std::f64::consts::TAU / period).sin())
            .collect()
    };

    DataFrame::new(vec![
        Series::new("date".into(), dates).into(),
        Series::new("us_cpi_yoy_pct".into(), wave(40.0, 2.5, 3.5)).into(),
        Series::new("us_unrate".into(), wave(55.0, 1.5, 5.0)).into(),
        Series::new("us_unrate_mom_pct".into(), wave(7.0, 0.8, 0.0)).into(),
        Series::new("us_fedfunds".into(), wave(60.0, 2.0, 3.0)).into(),
        Series::new("us_10y".into(), wave(30.0, 1.0, 3.5)).into(),
    ])
}

fn print_periods(title: &str, df: &DataFrame) -> PolarsResult<()> {
    println!("{}", title);
    let values = float_values(df, INDEX_COLUMN)?;
    let levels = str_values(df, "stress_level")?;
    for ((date, value), level) in date_values(df)?.into_iter().zip(values).zip(levels) {
        println!(
            "  {}  {:>6.2}  {}",
            date,
            value.unwrap_or(f64::NAN),
            level.unwrap_or_default()
        );
    }
    println!();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== macrowatch Stress Index Demo ===\n");

    let features = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            println!("Reading {}\n", path.display());
            read_table(&path)?
        }
        None => {
            println!("Using 72 synthetic months\n");
            synthetic_table(72)?
        }
    };

    // 1. Rule-based risk levels
    let risk = classify_frame(&features)?;
    let scores = float_values(&risk, "risk_score")?;
    let levels = str_values(&risk, "risk_level")?;
    println!("1. Latest risk assessments");
    let dates = date_values(&risk)?;
    let start = dates.len().saturating_sub(6);
    for row in start..dates.len() {
        println!(
            "  {}  score {}  {}",
            dates[row],
            scores[row].unwrap_or_default(),
            levels[row].as_deref().unwrap_or("")
        );
    }
    println!();

    // 2. Composite index and regimes
    let index = StressIndexBuilder::default().build(&risk)?;
    println!("2. Stress index over {} months\n", index.table.height());
    print_periods("Highest stress:", &index.top_high.head(Some(3)))?;
    print_periods("Lowest stress:", &index.top_low.head(Some(3)))?;

    // 3. Trend projection
    println!("3. Forecast");
    match &index.forecast {
        Some(forecast) => {
            for (date, value) in forecast.dates.iter().zip(&forecast.values) {
                println!("  {}  {:>6.2}", date, value);
            }
            if let Some(direction) = forecast.direction(0.15) {
                println!("  trend: {:?}", direction);
            }
        }
        None => println!("  not enough history"),
    }

    Ok(())
}
