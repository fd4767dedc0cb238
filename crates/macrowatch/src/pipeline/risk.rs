//! Risk classification and the SQLite snapshot built on top of it.

use super::Stage;
use crate::config::PipelineConfig;
use crate::error::Result;
use macrowatch_data::{SqliteStore, read_table, write_table};
use macrowatch_risk::classify_frame;
use tracing::info;

/// Table the risk rows are stored in.
pub const SQL_TABLE: &str = "macro_us";

/// Latest month with rounded indicators.
pub const SNAPSHOT_QUERY: &str = "\
SELECT date, risk_level, risk_score, alerts,
       ROUND(us_cpi_yoy_pct, 2) AS cpi_yoy_pct,
       ROUND(us_unrate, 2) AS unrate,
       ROUND(us_fedfunds, 2) AS fedfunds,
       ROUND(us_10y, 2) AS us10y
FROM macro_us
ORDER BY date DESC
LIMIT 1";

/// Twelve most recent months, newest first.
pub const LAST12_QUERY: &str = "\
SELECT date,
       ROUND(us_cpi_yoy_pct, 2) AS cpi_yoy_pct,
       ROUND(us_unrate, 2) AS unrate,
       ROUND(us_fedfunds, 2) AS fedfunds,
       ROUND(us_10y, 2) AS us10y,
       risk_level, risk_score
FROM macro_us
ORDER BY date DESC
LIMIT 12";

/// Scores every month of the monthly table.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskStage;

impl Stage for RiskStage {
    fn name(&self) -> &'static str {
        "risk"
    }

    fn description(&self) -> &'static str {
        "Apply the threshold rules and write the risk table"
    }

    fn run(&self, config: &PipelineConfig) -> Result<()> {
        let monthly = read_table(&config.monthly_path())?;
        let mut risk = classify_frame(&monthly)?;

        let path = config.risk_path();
        write_table(&path, &mut risk)?;
        info!(rows = risk.height(), path = %path.display(), "saved risk table");
        Ok(())
    }
}

/// Loads the risk table into SQLite and exports two summary queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlStage;

impl Stage for SqlStage {
    fn name(&self) -> &'static str {
        "sql"
    }

    fn description(&self) -> &'static str {
        "Store the risk table in SQLite and export snapshot queries"
    }

    fn run(&self, config: &PipelineConfig) -> Result<()> {
        let risk = read_table(&config.risk_path())?;
        let store = SqliteStore::new(config.database_path())?;
        let rows = store.replace_table(SQL_TABLE, &risk)?;
        info!(table = SQL_TABLE, rows, "stored risk table");

        for (query, path) in [
            (SNAPSHOT_QUERY, config.snapshot_path()),
            (LAST12_QUERY, config.last12_path()),
        ] {
            let mut df = store.query(query)?;
            write_table(&path, &mut df)?;
            info!(rows = df.height(), path = %path.display(), "saved query export");
        }
        Ok(())
    }
}
