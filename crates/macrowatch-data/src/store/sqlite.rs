//! SQLite store for pipeline tables.
//!
//! Tables are written whole (`DROP` + `CREATE` + bulk insert) so each run
//! replaces the previous contents, and arbitrary read-only queries come back
//! as frames.

use super::ensure_parent;
use crate::error::{DataError, Result};
use crate::frame::{float_values, int_values, str_values};
use polars::prelude::*;
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use std::path::Path;
use tracing::debug;

/// SQLite-backed table store.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        ensure_parent(path.as_ref())?;
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Replace `table` with the contents of `df`.
    ///
    /// Float columns become `REAL`, integer columns `INTEGER`, everything else
    /// `TEXT`. Returns the number of inserted rows.
    pub fn replace_table(&self, table: &str, df: &DataFrame) -> Result<usize> {
        validate_identifier(table)?;

        let columns = df.get_columns();
        let mut definitions = Vec::with_capacity(columns.len());
        let mut column_values = Vec::with_capacity(columns.len());
        for column in columns {
            let name = column.name().as_str();
            validate_identifier(name)?;
            let dtype = column.dtype();
            definitions.push(format!("\"{}\" {}", name, sql_type(dtype)));
            column_values.push(sql_values(df, name, dtype)?);
        }

        let placeholders = (1..=columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(&format!("DROP TABLE IF EXISTS \"{}\"", table), [])?;
        tx.execute(
            &format!("CREATE TABLE \"{}\" ({})", table, definitions.join(", ")),
            [],
        )?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO \"{}\" VALUES ({})",
                table, placeholders
            ))?;
            for row in 0..df.height() {
                stmt.execute(params_from_iter(
                    column_values.iter().map(|values| &values[row]),
                ))?;
            }
        }
        tx.commit()?;

        debug!(table, rows = df.height(), "replaced table");
        Ok(df.height())
    }

    /// Run a query and collect the result set into a frame.
    ///
    /// Result columns holding only integers become `i64`, numeric columns
    /// `f64`, anything else strings.
    pub fn query(&self, sql: &str) -> Result<DataFrame> {
        let mut stmt = self.conn.prepare(sql)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut values: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            for (i, column) in values.iter_mut().enumerate() {
                column.push(row.get::<_, Value>(i)?);
            }
        }

        let columns = names
            .iter()
            .zip(values)
            .map(|(name, column)| values_to_column(name, column))
            .collect::<Vec<_>>();
        Ok(DataFrame::new(columns)?)
    }

    /// Number of rows in `table`.
    pub fn row_count(&self, table: &str) -> Result<usize> {
        validate_identifier(table)?;
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM \"{}\"", table),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn validate_identifier(name: &str) -> Result<()> {
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DataError::Parse(format!("invalid SQL identifier: {:?}", name)))
    }
}

fn sql_type(dtype: &DataType) -> &'static str {
    if dtype.is_float() {
        "REAL"
    } else if dtype.is_integer() {
        "INTEGER"
    } else {
        "TEXT"
    }
}

fn sql_values(df: &DataFrame, name: &str, dtype: &DataType) -> Result<Vec<Value>> {
    let values = if dtype.is_float() {
        float_values(df, name)?
            .into_iter()
            .map(|v| v.map_or(Value::Null, Value::Real))
            .collect()
    } else if dtype.is_integer() {
        int_values(df, name)?
            .into_iter()
            .map(|v| v.map_or(Value::Null, Value::Integer))
            .collect()
    } else {
        str_values(df, name)?
            .into_iter()
            .map(|v| v.map_or(Value::Null, Value::Text))
            .collect()
    };
    Ok(values)
}

fn values_to_column(name: &str, values: Vec<Value>) -> Column {
    let all_integer = values
        .iter()
        .all(|v| matches!(v, Value::Integer(_) | Value::Null));
    let all_numeric = values
        .iter()
        .all(|v| matches!(v, Value::Integer(_) | Value::Real(_) | Value::Null));

    if all_integer {
        let ints: Vec<Option<i64>> = values
            .into_iter()
            .map(|v| match v {
                Value::Integer(i) => Some(i),
                _ => None,
            })
            .collect();
        Series::new(name.into(), ints).into()
    } else if all_numeric {
        let floats: Vec<Option<f64>> = values
            .into_iter()
            .map(|v| match v {
                Value::Integer(i) => Some(i as f64),
                Value::Real(r) => Some(r),
                _ => None,
            })
            .collect();
        Series::new(name.into(), floats).into()
    } else {
        let strings: Vec<Option<String>> = values
            .into_iter()
            .map(|v| match v {
                Value::Text(s) => Some(s),
                Value::Integer(i) => Some(i.to_string()),
                Value::Real(r) => Some(r.to_string()),
                Value::Null | Value::Blob(_) => None,
            })
            .collect();
        Series::new(name.into(), strings).into()
    }
}
