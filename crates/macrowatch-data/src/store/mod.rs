//! Persistence: CSV files for raw series and tables, SQLite for the
//! relational snapshot.

pub mod raw;
pub mod sqlite;
pub mod table;

pub use raw::{read_raw_series, write_raw_series};
pub use sqlite::SqliteStore;
pub use table::{read_table, write_table};

use std::path::Path;

/// Create the parent directory of `path` if needed.
pub(crate) fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
