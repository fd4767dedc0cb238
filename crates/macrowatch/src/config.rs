//! Pipeline configuration.
//!
//! Values come from, lowest priority first: built-in defaults, an optional
//! JSON file, and the environment (`FRED_API_KEY`, also read from a `.env`
//! file). Every artifact path is derived from `data_dir` and `reports_dir`.

use crate::error::{PipelineError, Result};
use macrowatch_data::{SeriesSpec, default_catalog};
use macrowatch_output::RECENT_CHART;
use macrowatch_risk::StressIndexConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable holding the FRED credential.
pub const API_KEY_VAR: &str = "FRED_API_KEY";

/// Stress index and report parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Forecast window, forecast horizon and top/bottom list length
    #[serde(flatten)]
    pub builder: StressIndexConfig,
    /// Years of history in the recent chart (default: 15)
    pub recent_chart_years: u32,
    /// Forecast delta beyond which the trend is not STABLE (default: 0.15)
    pub trend_threshold: f64,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            builder: StressIndexConfig::default(),
            recent_chart_years: 15,
            trend_threshold: 0.15,
        }
    }
}

/// Everything a stage needs to know about its environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root of `raw/` and `processed/` (default: `data`)
    pub data_dir: PathBuf,
    /// Directory for workbook, charts and brief (default: `reports`)
    pub reports_dir: PathBuf,
    /// Log file appended to by the CLI; `None` logs to stderr only
    pub log_file: Option<PathBuf>,
    /// Input series, in merge order
    pub series: Vec<SeriesSpec>,
    /// FRED credential; never read from or written to the config file
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Per-request HTTP timeout in seconds (default: 30)
    pub http_timeout_secs: u64,
    /// Stress index parameters
    pub index: IndexSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            reports_dir: PathBuf::from("reports"),
            log_file: Some(PathBuf::from("logs/automation.log")),
            series: default_catalog(),
            api_key: None,
            http_timeout_secs: 30,
            index: IndexSettings::default(),
        }
    }
}

impl PipelineConfig {
    /// Defaults rooted at `root` (`root/data`, `root/reports`, no log file).
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            data_dir: root.join("data"),
            reports_dir: root.join("reports"),
            log_file: None,
            ..Self::default()
        }
    }

    /// Parse a JSON config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
            .map_err(|e| PipelineError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse a JSON config document.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| PipelineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config file (if any), then take the API key from the
    /// environment, reading `.env` first when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        match dotenvy::dotenv() {
            Ok(env_file) => debug!(path = %env_file.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(PipelineError::Config(format!(".env: {}", e))),
        }

        Ok(config.with_api_key(std::env::var(API_KEY_VAR).ok()))
    }

    /// Set the credential; blank keys count as absent.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.series.is_empty() {
            return Err(PipelineError::Config("no series configured".to_string()));
        }
        if self.http_timeout_secs == 0 {
            return Err(PipelineError::Config(
                "http_timeout_secs must be positive".to_string(),
            ));
        }
        if !self.index.trend_threshold.is_finite() || self.index.trend_threshold < 0.0 {
            return Err(PipelineError::Config(
                "index.trend_threshold must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    /// HTTP timeout as a [`Duration`].
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// `data/raw`
    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }

    /// `data/processed`
    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join("processed")
    }

    /// Raw CSV of one series.
    pub fn raw_series_path(&self, name: &str) -> PathBuf {
        self.raw_dir().join(format!("{}.csv", name))
    }

    /// Merged monthly table with derived features.
    pub fn monthly_path(&self) -> PathBuf {
        self.processed_dir().join("macro_us_monthly.csv")
    }

    /// Risk table.
    pub fn risk_path(&self) -> PathBuf {
        self.processed_dir().join("macro_us_with_risk.csv")
    }

    /// SQLite database.
    pub fn database_path(&self) -> PathBuf {
        self.processed_dir().join("macro.db")
    }

    /// Latest-row SQL export.
    pub fn snapshot_path(&self) -> PathBuf {
        self.processed_dir().join("sql_snapshot.csv")
    }

    /// Last-twelve-months SQL export.
    pub fn last12_path(&self) -> PathBuf {
        self.processed_dir().join("sql_last12.csv")
    }

    /// Stress index table.
    pub fn index_path(&self) -> PathBuf {
        self.processed_dir().join("macro_us_with_index.csv")
    }

    /// Highest-stress months.
    pub fn top_high_path(&self) -> PathBuf {
        self.processed_dir().join("top_high_stress_periods.csv")
    }

    /// Lowest-stress months.
    pub fn top_low_path(&self) -> PathBuf {
        self.processed_dir().join("top_low_stress_periods.csv")
    }

    /// Projected index values.
    pub fn forecast_path(&self) -> PathBuf {
        self.processed_dir().join("macro_us_index_forecast.csv")
    }

    /// Excel report.
    pub fn workbook_path(&self) -> PathBuf {
        self.reports_dir.join("macro_us_report.xlsx")
    }

    /// Recent-window chart, embedded in the PDF brief.
    pub fn recent_chart_path(&self) -> PathBuf {
        self.reports_dir.join(RECENT_CHART)
    }

    /// PDF brief.
    pub fn pdf_path(&self) -> PathBuf {
        self.reports_dir.join("macro_us_executive_brief.pdf")
    }

    /// JSON export of the brief.
    pub fn brief_json_path(&self) -> PathBuf {
        self.reports_dir.join("macro_us_executive_brief.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.series.len(), 4);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert_eq!(config.index.builder.forecast_window, 24);
        assert_eq!(config.index.builder.forecast_horizon, 3);
        assert_eq!(config.index.builder.top_n, 10);
        assert_eq!(config.index.recent_chart_years, 15);
        assert_eq!(
            config.log_file.as_deref(),
            Some(Path::new("logs/automation.log"))
        );
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_artifact_paths() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.raw_series_path("us_10y"),
            Path::new("data/raw/us_10y.csv")
        );
        assert_eq!(
            config.risk_path(),
            Path::new("data/processed/macro_us_with_risk.csv")
        );
        assert_eq!(config.database_path(), Path::new("data/processed/macro.db"));
        assert_eq!(
            config.forecast_path(),
            Path::new("data/processed/macro_us_index_forecast.csv")
        );
        assert_eq!(
            config.workbook_path(),
            Path::new("reports/macro_us_report.xlsx")
        );
        assert_eq!(
            config.pdf_path(),
            Path::new("reports/macro_us_executive_brief.pdf")
        );
        assert_eq!(
            config.recent_chart_path(),
            Path::new("reports/macro_stress_index_recent.png")
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PipelineConfig::from_json(
            r#"{"data_dir": "/tmp/mw", "index": {"forecast_window": 12, "trend_threshold": 0.3}}"#,
        )
        .unwrap();
        assert_eq!(config.data_dir, Path::new("/tmp/mw"));
        assert_eq!(config.reports_dir, Path::new("reports"));
        assert_eq!(config.index.builder.forecast_window, 12);
        assert_eq!(config.index.builder.forecast_horizon, 3);
        assert_eq!(config.index.recent_chart_years, 15);
        assert!((config.index.trend_threshold - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let config = PipelineConfig::default().with_api_key(Some("secret".to_string()));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));

        let parsed = PipelineConfig::from_json(r#"{"api_key": "from-file"}"#).unwrap();
        assert!(parsed.api_key.is_none());
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        let config = PipelineConfig::default().with_api_key(Some("  ".to_string()));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            PipelineConfig::from_json(r#"{"series": []}"#),
            Err(PipelineError::Config(_))
        ));
        assert!(matches!(
            PipelineConfig::from_json("not json"),
            Err(PipelineError::Config(_))
        ));
        assert!(matches!(
            PipelineConfig::from_file(Path::new("/nonexistent/macrowatch.json")),
            Err(PipelineError::Config(_))
        ));
    }
}
