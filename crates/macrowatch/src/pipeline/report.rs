//! Report stages: charts, workbook, PDF brief, and the text summary.

use super::{Stage, read_optional};
use crate::config::PipelineConfig;
use crate::error::Result;
use macrowatch_data::frame::{date_values, float_values};
use macrowatch_data::read_table;
use macrowatch_output::{
    ExecutiveBrief, ExportFormat, Exporter, IndexPoint, RiskSummary, WorkbookInputs,
    render_index_charts, write_workbook,
};
use macrowatch_risk::INDEX_COLUMN;
use polars::prelude::{DataFrame, PolarsResult};
use tracing::{info, warn};

fn index_points(df: &DataFrame) -> PolarsResult<Vec<IndexPoint>> {
    let dates = date_values(df)?;
    let values = float_values(df, INDEX_COLUMN)?;
    Ok(dates
        .into_iter()
        .zip(values)
        .filter_map(|(date, value)| value.map(|v| (date, v)))
        .collect())
}

/// Full-history and recent-window PNG charts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartsStage;

impl Stage for ChartsStage {
    fn name(&self) -> &'static str {
        "charts"
    }

    fn description(&self) -> &'static str {
        "Plot the index history with its forecast"
    }

    fn run(&self, config: &PipelineConfig) -> Result<()> {
        let history = index_points(&read_table(&config.index_path())?)?;
        let forecast = match read_optional(&config.forecast_path())? {
            Some(df) => index_points(&df)?,
            None => Vec::new(),
        };

        let (full, recent) = render_index_charts(
            &config.reports_dir,
            &history,
            &forecast,
            config.index.recent_chart_years,
        )?;
        info!(full = %full.display(), recent = %recent.display(), "saved charts");
        Ok(())
    }
}

/// Excel report over the risk, SQL and index outputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookStage;

impl Stage for WorkbookStage {
    fn name(&self) -> &'static str {
        "workbook"
    }

    fn description(&self) -> &'static str {
        "Write the multi-sheet Excel report"
    }

    fn run(&self, config: &PipelineConfig) -> Result<()> {
        let inputs = WorkbookInputs {
            snapshot: read_optional(&config.snapshot_path())?,
            last12: read_optional(&config.last12_path())?,
            index: read_optional(&config.index_path())?,
            top_high: read_optional(&config.top_high_path())?,
            top_low: read_optional(&config.top_low_path())?,
            ..WorkbookInputs::new(read_table(&config.risk_path())?)
        };
        write_workbook(&config.workbook_path(), &inputs)?;
        Ok(())
    }
}

/// One-page PDF brief plus its JSON export.
#[derive(Debug, Clone, Copy, Default)]
pub struct BriefStage;

impl Stage for BriefStage {
    fn name(&self) -> &'static str {
        "brief"
    }

    fn description(&self) -> &'static str {
        "Render the executive brief PDF and JSON"
    }

    fn run(&self, config: &PipelineConfig) -> Result<()> {
        let index = read_table(&config.index_path())?;
        let forecast = read_optional(&config.forecast_path())?;
        let top_high = read_optional(&config.top_high_path())?;

        let brief = ExecutiveBrief::from_tables(
            &index,
            forecast.as_ref(),
            top_high.as_ref(),
            config.index.trend_threshold,
        )?;
        let chart = config.recent_chart_path();
        let chart = if chart.exists() {
            Some(chart)
        } else {
            warn!(path = %chart.display(), "recent chart not found; brief has no chart");
            None
        };
        brief.render_pdf(&config.pdf_path(), chart.as_deref())?;

        let json = config.brief_json_path();
        brief.export_to_file(&json, ExportFormat::PrettyJson)?;
        info!(
            date = %brief.report_date,
            level = %brief.stress_level,
            path = %json.display(),
            "saved brief"
        );
        Ok(())
    }
}

/// Text summary of the latest month of the risk table.
pub fn latest_risk_summary(config: &PipelineConfig) -> Result<RiskSummary> {
    let risk = read_table(&config.risk_path())?;
    Ok(RiskSummary::from_risk_table(&risk)?)
}
