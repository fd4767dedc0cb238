//! Stress index, extreme months and forecast.

use super::Stage;
use crate::config::PipelineConfig;
use crate::error::Result;
use macrowatch_data::{read_table, write_table};
use macrowatch_risk::StressIndexBuilder;
use tracing::{info, warn};

/// Builds the composite index from the risk table.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexStage;

impl Stage for IndexStage {
    fn name(&self) -> &'static str {
        "index"
    }

    fn description(&self) -> &'static str {
        "Compute the macro stress index, regimes, extremes and forecast"
    }

    fn run(&self, config: &PipelineConfig) -> Result<()> {
        let risk = read_table(&config.risk_path())?;
        let builder = StressIndexBuilder::new(config.index.builder)?;
        let mut index = builder.build(&risk)?;

        if index.forecast.is_none() {
            warn!("fewer than two index rows; forecast table will be empty");
        }
        let mut forecast = index.forecast_frame()?;

        for (df, path) in [
            (&mut index.table, config.index_path()),
            (&mut index.top_high, config.top_high_path()),
            (&mut index.top_low, config.top_low_path()),
            (&mut forecast, config.forecast_path()),
        ] {
            write_table(&path, df)?;
            info!(rows = df.height(), path = %path.display(), "saved index output");
        }
        Ok(())
    }
}
