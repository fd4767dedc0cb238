//! Render every report sink from a synthetic risk table.
//!
//! Output goes to the directory given as the first argument, or to
//! `macrowatch-demo` under the system temp directory.

use chrono::{Months, NaiveDate};
use macrowatch_data::frame::{date_values, float_values};
use macrowatch_output::{
    ExecutiveBrief, ExportFormat, Exporter, IndexPoint, RiskSummary, WorkbookInputs,
    render_index_charts, write_workbook,
};
use macrowatch_risk::{INDEX_COLUMN, StressIndexBuilder, classify_frame};
use polars::prelude::*;
use std::path::PathBuf;

fn features(months: u32) -> PolarsResult<DataFrame> {
    let start = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
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
        Series::new("us_cpi_yoy_pct".into(), wave(48.0, 2.5, 3.0)).into(),
        Series::new("us_unrate".into(), wave(70.0, 2.0, 5.5)).into(),
        Series::new("us_unrate_mom_pct".into(), wave(9.0, 0.9, 0.0)).into(),
        Series::new("us_fedfunds".into(), wave(80.0, 2.5, 2.5)).into(),
        Series::new("us_10y".into(), wave(36.0, 1.2, 3.2)).into(),
    ])
}

fn points(df: &DataFrame) -> PolarsResult<Vec<IndexPoint>> {
    Ok(date_values(df)?
        .into_iter()
        .zip(float_values(df, INDEX_COLUMN)?)
        .filter_map(|(date, value)| value.map(|v| (date, v)))
        .collect())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== macrowatch Report Demo ===\n");

    let out = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("macrowatch-demo"));
    std::fs::create_dir_all(&out)?;

    let risk = classify_frame(&features(180)?)?;
    let index = StressIndexBuilder::default().build(&risk)?;
    let forecast = index.forecast_frame()?;

    // 1. Text summary of the latest month
    println!("1. Risk summary\n");
    println!("{}", RiskSummary::from_risk_table(&risk)?);

    // 2. Charts
    let (full, recent) =
        render_index_charts(&out, &points(&index.table)?, &points(&forecast)?, 10)?;
    println!("2. Charts\n  {}\n  {}\n", full.display(), recent.display());

    // 3. Workbook
    let inputs = WorkbookInputs {
        snapshot: Some(risk.tail(Some(1))),
        last12: Some(risk.tail(Some(12))),
        index: Some(index.table.clone()),
        top_high: Some(index.top_high.clone()),
        top_low: Some(index.top_low.clone()),
        ..WorkbookInputs::new(risk.clone())
    };
    let workbook = out.join("macro_us_report.xlsx");
    let sheets = write_workbook(&workbook, &inputs)?;
    println!("3. Workbook {} ({})\n", workbook.display(), sheets.join(", "));

    // 4. Executive brief
    let brief = ExecutiveBrief::from_tables(
        &index.table,
        Some(&forecast),
        Some(&index.top_high),
        0.15,
    )?;
    let pdf = out.join("macro_us_executive_brief.pdf");
    brief.render_pdf(&pdf, Some(&recent))?;
    println!("4. Executive brief {}\n", pdf.display());
    println!("{}", brief.export_to_string(ExportFormat::PrettyJson)?);

    Ok(())
}
