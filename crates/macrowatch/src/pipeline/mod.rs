//! Sequential stage runner.
//!
//! Each stage reads its inputs from disk, writes its artifacts, and returns.
//! The pipeline runs them in a fixed order and stops at the first failure;
//! artifacts already written by earlier stages are left in place.

pub mod build;
pub mod fetch;
pub mod index;
pub mod report;
pub mod risk;

pub use build::BuildStage;
pub use fetch::FetchStage;
pub use index::IndexStage;
pub use report::{BriefStage, ChartsStage, WorkbookStage, latest_risk_summary};
pub use risk::{RiskStage, SqlStage};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use macrowatch_data::{DataError, read_table};
use polars::prelude::DataFrame;
use std::fmt::Debug;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info};

/// One step of the batch.
pub trait Stage: Debug {
    /// Name used on the command line and in logs.
    fn name(&self) -> &'static str;

    /// One-line description.
    fn description(&self) -> &'static str;

    /// Run the stage to completion.
    fn run(&self, config: &PipelineConfig) -> Result<()>;
}

/// Ordered list of stages.
#[derive(Debug)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(vec![
            Box::new(FetchStage),
            Box::new(BuildStage),
            Box::new(RiskStage),
            Box::new(SqlStage),
            Box::new(IndexStage),
            Box::new(ChartsStage),
            Box::new(WorkbookStage),
            Box::new(BriefStage),
        ])
    }
}

impl Pipeline {
    /// Pipeline over an explicit stage list.
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Stages in run order.
    pub fn stages(&self) -> impl Iterator<Item = &dyn Stage> {
        self.stages.iter().map(|stage| stage.as_ref())
    }

    /// Stage names in run order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages().map(|stage| stage.name()).collect()
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Look up a stage by name.
    pub fn get(&self, name: &str) -> Option<&dyn Stage> {
        self.stages().find(|stage| stage.name() == name)
    }

    /// Run every stage in order.
    pub fn run(&self, config: &PipelineConfig) -> Result<()> {
        self.run_with(config, |_, _| {})
    }

    /// Run every stage in order, calling `on_stage` with the position and
    /// stage before each one starts.
    pub fn run_with<F>(&self, config: &PipelineConfig, mut on_stage: F) -> Result<()>
    where
        F: FnMut(usize, &dyn Stage),
    {
        let started = Instant::now();
        for (position, stage) in self.stages().enumerate() {
            on_stage(position, stage);
            run_stage(stage, config)?;
        }
        info!(
            stages = self.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pipeline finished"
        );
        Ok(())
    }

    /// Run a single stage by name.
    pub fn run_stage(&self, name: &str, config: &PipelineConfig) -> Result<()> {
        let stage = self
            .get(name)
            .ok_or_else(|| PipelineError::UnknownStage(name.to_string()))?;
        run_stage(stage, config)
    }
}

fn run_stage(stage: &dyn Stage, config: &PipelineConfig) -> Result<()> {
    let name = stage.name();
    info!(stage = name, "running stage");
    let started = Instant::now();

    stage.run(config).map_err(|e| {
        error!(stage = name, category = %e.category(), error = %e, "stage failed");
        PipelineError::Stage {
            stage: name,
            source: Box::new(e),
        }
    })?;

    info!(
        stage = name,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "stage finished"
    );
    Ok(())
}

/// Read an upstream table that may legitimately be absent.
pub(crate) fn read_optional(path: &Path) -> Result<Option<DataFrame>> {
    match read_table(path) {
        Ok(df) => Ok(Some(df)),
        Err(DataError::MissingArtifact(path)) => {
            debug!(path = %path.display(), "optional input not found");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
