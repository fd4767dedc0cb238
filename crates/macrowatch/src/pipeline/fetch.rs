//! Download every configured series and store it under `data/raw`.

use super::Stage;
use crate::config::PipelineConfig;
use crate::error::Result;
use macrowatch_data::{FredClient, write_raw_series};
use tracing::info;

/// One FRED request per configured series.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchStage;

impl Stage for FetchStage {
    fn name(&self) -> &'static str {
        "fetch"
    }

    fn description(&self) -> &'static str {
        "Download raw series from FRED"
    }

    fn run(&self, config: &PipelineConfig) -> Result<()> {
        let client = FredClient::with_timeout(config.api_key.clone(), config.http_timeout())?;

        for spec in &config.series {
            let series = client
                .fetch_series(&spec.series_id)?
                .with_name(spec.name.as_str());
            let path = config.raw_series_path(&spec.name);
            write_raw_series(&path, &series)?;
            info!(
                series = %spec.name,
                series_id = %spec.series_id,
                rows = series.len(),
                path = %path.display(),
                "saved raw series"
            );
        }
        Ok(())
    }
}
