//! Raw series CSV files (`date,value`).

use super::ensure_parent;
use crate::error::{DataError, Result};
use crate::series::{Observation, RawSeries};
use std::path::Path;
use tracing::debug;

/// Write a raw series to `path`, replacing any previous file.
pub fn write_raw_series(path: &Path, series: &RawSeries) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    if series.is_empty() {
        writer.write_record(["date", "value"])?;
    }
    for observation in series.observations() {
        writer.serialize(observation)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = series.len(), "wrote raw series");
    Ok(())
}

/// Read a raw series written by [`write_raw_series`]; the result is cleaned
/// again so hand-edited files still satisfy the series invariants.
pub fn read_raw_series(path: &Path, name: &str) -> Result<RawSeries> {
    if !path.exists() {
        return Err(DataError::MissingArtifact(path.to_path_buf()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let observations = reader
        .deserialize::<Observation>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(RawSeries::cleaned(name, observations))
}
