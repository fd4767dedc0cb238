//! PNG line charts of the stress index with its forecast.
//!
//! Dates go on the x axis as fractional years so plotters can treat both
//! series as plain `f64` coordinates. Text is drawn with a bundled DejaVu Sans
//! face registered as plotters' `sans-serif` family.

use crate::error::{ReportError, Result};
use chrono::{Datelike, Months, NaiveDate};
use plotters::prelude::*;
use plotters::style::register_font;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};

const SIZE: (u32, u32) = (1200, 600);

/// File name of the full-history chart.
pub const FULL_CHART: &str = "macro_stress_index_full.png";

/// File name of the recent-window chart.
pub const RECENT_CHART: &str = "macro_stress_index_recent.png";

static SANS: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// One `(date, index)` point.
pub type IndexPoint = (NaiveDate, f64);

fn chart_error(e: impl std::fmt::Display) -> ReportError {
    ReportError::Chart(e.to_string())
}

/// Register the bundled face once per process.
fn register_fonts() -> Result<()> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let registered = *REGISTERED.get_or_init(|| {
        let ok = register_font("sans-serif", FontStyle::Normal, SANS).is_ok();
        debug!(ok, "registered chart font");
        ok
    });
    if registered {
        Ok(())
    } else {
        Err(chart_error("bundled chart font could not be parsed"))
    }
}

fn fractional_year(date: NaiveDate) -> f64 {
    f64::from(date.year()) + f64::from(date.month0()) / 12.0
}

/// Points of `history` within `years` of its last date.
pub fn trailing_years(history: &[IndexPoint], years: u32) -> &[IndexPoint] {
    let Some(&(last, _)) = history.last() else {
        return history;
    };
    let Some(cutoff) = last.checked_sub_months(Months::new(years.saturating_mul(12))) else {
        return history;
    };
    let start = history.partition_point(|&(date, _)| date < cutoff);
    &history[start..]
}

fn bounds(points: impl Iterator<Item = (f64, f64)>) -> Option<((f64, f64), (f64, f64))> {
    points.fold(None, |acc, (x, y)| {
        let ((x0, x1), (y0, y1)) = acc.unwrap_or(((x, x), (y, y)));
        Some(((x0.min(x), x1.max(x)), (y0.min(y), y1.max(y))))
    })
}

/// Draw history (blue) and forecast (red, with markers) into a PNG at `path`.
pub fn render_index_chart(
    path: &Path,
    title: &str,
    history: &[IndexPoint],
    forecast: &[IndexPoint],
) -> Result<()> {
    let to_xy = |&(date, value): &IndexPoint| (fractional_year(date), value);
    let hist: Vec<(f64, f64)> = history.iter().map(to_xy).collect();
    let fc: Vec<(f64, f64)> = forecast.iter().map(to_xy).collect();

    let ((x0, x1), (y0, y1)) = bounds(hist.iter().chain(&fc).copied())
        .ok_or_else(|| ReportError::EmptyTable("chart has no points".to_string()))?;
    let x_pad = ((x1 - x0) * 0.02).max(0.1);
    let y_pad = ((y1 - y0) * 0.1).max(0.5);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    register_fonts()?;
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d((x0 - x_pad)..(x1 + x_pad), (y0 - y_pad)..(y1 + y_pad))
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Index Value")
        .x_label_formatter(&|v| format!("{:.0}", v.floor()))
        .y_label_formatter(&|v| format!("{:.1}", v))
        .draw()
        .map_err(chart_error)?;

    // Zero line.
    chart
        .draw_series(LineSeries::new(
            [(x0 - x_pad, 0.0), (x1 + x_pad, 0.0)],
            &BLACK.mix(0.4),
        ))
        .map_err(chart_error)?;

    chart
        .draw_series(LineSeries::new(hist.iter().copied(), &BLUE))
        .map_err(chart_error)?
        .label("Historical Index")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    if !fc.is_empty() {
        // Join the forecast to the last historical point.
        let joined: Vec<(f64, f64)> = hist.last().into_iter().chain(&fc).copied().collect();
        chart
            .draw_series(LineSeries::new(joined, RED.stroke_width(2)))
            .map_err(chart_error)?
            .label("Forecast")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
        chart
            .draw_series(fc.iter().map(|&p| Circle::new(p, 4, RED.filled())))
            .map_err(chart_error)?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    info!(path = %path.display(), points = hist.len(), "wrote chart");
    Ok(())
}

/// Render the full-history chart and the recent-window chart into `dir`.
///
/// Returns the two paths, full first.
pub fn render_index_charts(
    dir: &Path,
    history: &[IndexPoint],
    forecast: &[IndexPoint],
    recent_years: u32,
) -> Result<(PathBuf, PathBuf)> {
    let full = dir.join(FULL_CHART);
    render_index_chart(
        &full,
        "US Macro Stress Index (Full History + Forecast)",
        history,
        forecast,
    )?;

    let recent = dir.join(RECENT_CHART);
    render_index_chart(
        &recent,
        &format!("US Macro Stress Index (Last {} Years + Forecast)", recent_years),
        trailing_years(history, recent_years),
        forecast,
    )?;

    Ok((full, recent))
}
