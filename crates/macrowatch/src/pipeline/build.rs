//! Monthly table: normalize each raw series, join them, add derived columns.

use super::Stage;
use crate::config::PipelineConfig;
use crate::error::Result;
use macrowatch_data::{read_raw_series, write_table};
use macrowatch_features::{Aggregation, augment_all, merge_monthly, normalize_monthly};
use tracing::{debug, info};

/// Builds `macro_us_monthly.csv` from the raw series.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildStage;

impl Stage for BuildStage {
    fn name(&self) -> &'static str {
        "build"
    }

    fn description(&self) -> &'static str {
        "Normalize to month start, merge and add MoM/YoY/rolling features"
    }

    fn run(&self, config: &PipelineConfig) -> Result<()> {
        let mut monthly = Vec::with_capacity(config.series.len());
        for spec in &config.series {
            // Validate the mode before touching the file.
            let aggregation: Aggregation = spec.aggregation.parse()?;
            let raw = read_raw_series(&config.raw_series_path(&spec.name), &spec.name)?;
            let series = normalize_monthly(&raw, aggregation);
            debug!(
                series = %spec.name,
                aggregation = aggregation.as_str(),
                months = series.len(),
                "normalized"
            );
            monthly.push(series);
        }

        let merged = merge_monthly(&monthly)?;
        let bases: Vec<&str> = config.series.iter().map(|s| s.name.as_str()).collect();
        let mut features = augment_all(merged, &bases)?;

        let path = config.monthly_path();
        write_table(&path, &mut features)?;
        info!(
            rows = features.height(),
            columns = features.width(),
            path = %path.display(),
            "saved monthly table"
        );
        Ok(())
    }
}
