//! CSV persistence for pipeline tables.

use super::ensure_parent;
use crate::error::{DataError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Write a table to `path` with a header row, replacing any previous file.
pub fn write_table(path: &Path, df: &mut DataFrame) -> Result<()> {
    ensure_parent(path)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    debug!(path = %path.display(), rows = df.height(), "wrote table");
    Ok(())
}

/// Read a table written by [`write_table`].
///
/// Dates stay as ISO strings; use [`crate::frame`] to get typed values.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(DataError::MissingArtifact(path.to_path_buf()));
    }
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{float_values, str_values};

    #[test]
    fn test_table_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed").join("table.csv");
        let mut df = DataFrame::new(vec![
            Series::new("date".into(), vec!["2024-01-01", "2024-02-01", "2024-03-01"]).into(),
            Series::new("us_cpi".into(), vec![Some(308.4), None, Some(310.3)]).into(),
            Series::new("alerts".into(), vec!["", "Bond Yield Stress", ""]).into(),
        ])
        .unwrap();

        write_table(&path, &mut df).unwrap();
        let back = read_table(&path).unwrap();

        assert_eq!(back.height(), 3);
        assert_eq!(back.get_column_names(), df.get_column_names());
        assert_eq!(
            float_values(&back, "us_cpi").unwrap(),
            vec![Some(308.4), None, Some(310.3)]
        );
        let dates = str_values(&back, "date").unwrap();
        assert_eq!(dates[0].as_deref(), Some("2024-01-01"));
        assert_eq!(dates[2].as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn test_read_missing_table() {
        let result = read_table(Path::new("/nonexistent/table.csv"));
        assert!(matches!(result, Err(DataError::MissingArtifact(_))));
    }
}
