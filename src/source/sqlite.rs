//! SQLite table as a capped range-query upstream.

use anyhow::{Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde_json::{Map, Value};
use std::path::Path;

use crate::engine::executor::Upstream;
use crate::error::TooManyResults;

/// One row, column name → JSON value.
pub type Row = Map<String, Value>;

/// Open an existing database read-only; sweeping never writes.
pub fn open_source_db(path: &Path) -> Result<Connection> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("open source database {}", path.display()))
}

/// Quote an SQL identifier (table or column) with doubled inner quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Answers `[lo, hi]` with the rows whose `key` column falls in range, ordered by key.
/// More than `cap` rows is reported as [`TooManyResults`].
pub struct SqliteUpstream<'c> {
    conn: &'c Connection,
    range_sql: String,
    bounds_sql: String,
    cap: u64,
}

impl<'c> SqliteUpstream<'c> {
    pub fn new(conn: &'c Connection, table: &str, key: &str, cap: u64) -> Self {
        let (table, key) = (quote_ident(table), quote_ident(key));
        Self {
            conn,
            range_sql: format!(
                "SELECT * FROM {table} WHERE {key} BETWEEN ?1 AND ?2 ORDER BY {key} LIMIT ?3"
            ),
            bounds_sql: format!("SELECT MIN({key}), MAX({key}) FROM {table}"),
            cap,
        }
    }

    /// `(MIN(key), MAX(key))`, or `None` for an empty table.
    pub fn key_bounds(&self) -> Result<Option<(u64, u64)>> {
        let (min, max): (Option<i64>, Option<i64>) = self
            .conn
            .query_row(&self.bounds_sql, [], |row| Ok((row.get(0)?, row.get(1)?)))
            .context("read key bounds")?;
        match (min, max) {
            (Some(min), Some(max)) => Ok(Some((to_key(min)?, to_key(max)?))),
            _ => Ok(None),
        }
    }

    /// Current highest key; the sweep's upper bound when none is given.
    pub fn head(&self) -> Result<u64> {
        self.key_bounds()?
            .map(|(_, max)| max)
            .context("source table is empty")
    }

    fn fetch(&self, lo: u64, hi: u64) -> Result<Vec<Row>> {
        let lo = i64::try_from(lo).context("range start exceeds SQLite integer range")?;
        // Keys are i64 in SQLite; clamp so a wide tail range still binds.
        let hi = i64::try_from(hi).unwrap_or(i64::MAX);
        let limit = i64::try_from(self.cap.saturating_add(1)).unwrap_or(i64::MAX);

        let mut stmt = self
            .conn
            .prepare_cached(&self.range_sql)
            .context("prepare range query")?;
        let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();
        let mut rows = stmt.query(rusqlite::params![lo, hi, limit])?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            if out.len() as u64 >= self.cap {
                return Err(TooManyResults { cap: self.cap }.into());
            }
            let mut record = Map::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                record.insert(name.clone(), value_to_json(row.get_ref(i)?));
            }
            out.push(record);
        }
        Ok(out)
    }
}

impl Upstream for SqliteUpstream<'_> {
    type Record = Row;

    fn query(&mut self, lo: u64, hi: u64) -> Result<Vec<Row>> {
        self.fetch(lo, hi)
    }
}

fn to_key(v: i64) -> Result<u64> {
    u64::try_from(v).with_context(|| format!("negative key {v} cannot be swept"))
}

/// SQLite value → JSON. Blobs become lowercase hex strings.
pub fn value_to_json(v: ValueRef<'_>) -> Value {
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(b.iter().map(|byte| format!("{byte:02x}")).collect()),
    }
}
