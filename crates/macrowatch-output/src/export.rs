//! CSV and JSON export of the executive brief.

use crate::brief::{ExecutiveBrief, StressPeriod};
use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<()> {
        let content = self.export_to_string(format)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Single-row CSV layout of the brief.
#[derive(Debug, Serialize)]
struct BriefRecord<'a> {
    report_date: String,
    macro_stress_index: f64,
    stress_level: &'a str,
    percentile: f64,
    forecast_trend: &'a str,
    forecast_delta: f64,
    strategy: &'a str,
    top_periods: String,
}

impl<'a> From<&'a ExecutiveBrief> for BriefRecord<'a> {
    fn from(brief: &'a ExecutiveBrief) -> Self {
        Self {
            report_date: brief.report_date.to_string(),
            macro_stress_index: brief.macro_stress_index,
            stress_level: &brief.stress_level,
            percentile: brief.percentile,
            forecast_trend: brief.forecast_trend.as_ref().map_or("N/A", |t| t.label()),
            forecast_delta: brief.forecast_delta,
            strategy: &brief.strategy,
            top_periods: brief
                .top_periods
                .iter()
                .map(StressPeriod::describe)
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

fn csv_string<T: Serialize>(records: impl IntoIterator<Item = T>) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

impl Exporter for ExecutiveBrief {
    fn export_to_string(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Csv => csv_string([BriefRecord::from(self)]),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for Vec<StressPeriod> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Csv => csv_string(self.iter()),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use macrowatch_risk::TrendDirection;

    fn brief() -> ExecutiveBrief {
        ExecutiveBrief {
            report_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            macro_stress_index: 1.234,
            stress_level: "ELEVATED".to_string(),
            percentile: 81.0,
            forecast_trend: Some(TrendDirection::Decreasing),
            forecast_delta: -0.4,
            strategy: "Tightening: Consider Utilities, Value".to_string(),
            top_periods: vec![StressPeriod {
                date: NaiveDate::from_ymd_opt(1980, 3, 1).unwrap(),
                macro_stress_index: 6.5,
            }],
        }
    }

    #[test]
    fn test_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }

    #[test]
    fn test_brief_csv() {
        let csv = brief().export_to_string(ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some(
                "report_date,macro_stress_index,stress_level,percentile,forecast_trend,\
                 forecast_delta,strategy,top_periods"
            )
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("2024-06-01,1.234,ELEVATED,81.0,DECREASING,-0.4,"));
        assert!(row.contains("1980-03-01 (Index 6.50)"));
    }

    #[test]
    fn test_brief_json_round_trip() {
        let json = brief().export_to_string(ExportFormat::Json).unwrap();
        assert!(json.contains("\"forecast_trend\":\"DECREASING\""));
        let back: ExecutiveBrief = serde_json::from_str(&json).unwrap();
        assert_eq!(back, brief());
    }

    #[test]
    fn test_pretty_json() {
        let json = brief().export_to_string(ExportFormat::PrettyJson).unwrap();
        assert!(json.contains("  \"stress_level\": \"ELEVATED\""));
    }

    #[test]
    fn test_periods_csv() {
        let periods = brief().top_periods;
        let csv = periods.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.starts_with("date,macro_stress_index\n1980-03-01,6.5"));
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("brief.json");
        brief().export_to_file(&path, ExportFormat::PrettyJson).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("ELEVATED"));
    }
}
