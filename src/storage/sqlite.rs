//! SQLite staging store
//!
//! Every operation opens its own connection and commits before returning;
//! the connection closes when it drops.

use crate::error::EtlError;
use crate::etl::Loader;
use crate::model::StagedTransaction;

use eyre::{Context, Result};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, params};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// A validated, plain SQL table name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    /// Accepts ASCII letters, digits and underscores, not starting with a digit
    pub fn new(name: impl Into<String>) -> Result<Self, EtlError> {
        let name = name.into();
        let mut chars = name.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first.is_ascii_alphabetic() || first == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            None => false,
        };
        match valid {
            true => Ok(Self(name)),
            false => Err(EtlError::InvalidTableName(name)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of [`SqliteStore::ensure_table`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    Created,
    AlreadyPresent,
}

/// Row count and leading rows of a table, for post-load verification
#[derive(Debug, Clone, PartialEq)]
pub struct TableSnapshot {
    pub row_count: usize,
    pub columns: Vec<String>,
    pub sample: Vec<Vec<Value>>,
}

/// Handle on the SQLite file holding the staging table
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection, creating the file and its parent directory if needed
    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }
        Connection::open(&self.path)
            .with_context(|| format!("Failed to open database: {}", self.path.display()))
    }

    /// Check whether `table` exists in the store
    pub fn has_table(&self, table: &TableName) -> Result<bool> {
        let conn = self.open()?;
        table_exists(&conn, table)
    }

    /// Create the staging table unless it already exists
    ///
    /// Presence is checked on the table itself, so an existing database file
    /// that lacks the table still gets it created.
    pub fn ensure_table(&self, table: &TableName) -> Result<SchemaStatus> {
        let conn = self.open()?;

        if table_exists(&conn, table)? {
            return Ok(SchemaStatus::AlreadyPresent);
        }

        conn.execute_batch(&create_table_sql(table))
            .with_context(|| format!("Failed to create table {}", table))?;
        Ok(SchemaStatus::Created)
    }

    /// Drop and recreate `table`, then insert `rows`, in one transaction
    pub fn replace_table(&self, table: &TableName, rows: &[StagedTransaction]) -> Result<usize> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {};\n{}",
            table.quoted(),
            create_table_sql(table)
        ))
        .with_context(|| format!("Failed to recreate table {}", table))?;

        {
            let mut insert = tx.prepare(&format!(
                "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                table.quoted(),
                StagedTransaction::COLUMNS.join(", ")
            ))?;

            for row in rows {
                insert
                    .execute(params![
                        row.txn_id,
                        row.customer_id,
                        row.txn_date,
                        row.amount,
                        row.signup_date,
                        row.days_since_signup,
                    ])
                    .with_context(|| format!("Failed to insert txn_id {}", row.txn_id))?;
            }
        }

        tx.commit()
            .with_context(|| format!("Failed to commit load of table {}", table))?;
        Ok(rows.len())
    }

    /// Count the rows of `table` and fetch up to `limit` of them
    pub fn inspect(&self, table: &TableName, limit: usize) -> Result<TableSnapshot> {
        let conn = self.open()?;

        let row_count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table.quoted()), [], |row| {
                row.get(0)
            })
            .with_context(|| format!("Failed to count rows in {}", table))?;

        let mut stmt = conn.prepare(&format!("SELECT * FROM {} LIMIT ?1", table.quoted()))?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = stmt.column_count();

        let sample = stmt
            .query_map(params![sql_limit(limit)], |row| {
                (0..width)
                    .map(|i| row.get::<_, SqlValue>(i).map(sql_to_json))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("Failed to sample rows from {}", table))?;

        Ok(TableSnapshot {
            row_count: row_count as usize,
            columns,
            sample,
        })
    }
}

// A negative LIMIT means no limit to SQLite, so clamp instead of wrapping.
fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn table_exists(conn: &Connection, table: &TableName) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table.as_str()],
            |row| row.get(0),
        )
        .with_context(|| format!("Failed to look up table {}", table))?;
    Ok(count > 0)
}

// No primary key: duplicate txn_id values load as separate rows.
fn create_table_sql(table: &TableName) -> String {
    format!(
        "CREATE TABLE {} (
            txn_id INTEGER,
            customer_id INTEGER,
            txn_date DATE,
            amount REAL,
            signup_date DATE,
            days_since_signup INTEGER
        );",
        table.quoted()
    )
}

fn sql_to_json(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::from(i),
        SqlValue::Real(f) => Value::from(f),
        SqlValue::Text(s) => Value::String(s),
        SqlValue::Blob(b) => Value::String(format!("<{} byte blob>", b.len())),
    }
}

/// Loader that replaces the staging table with the loaded rows
pub struct SqliteLoader {
    store: SqliteStore,
    table: TableName,
}

impl SqliteLoader {
    pub fn new(store: SqliteStore, table: TableName) -> Self {
        Self { store, table }
    }
}

impl Loader for SqliteLoader {
    type Item = StagedTransaction;

    fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        log::info!(
            "Connected to {} for data loading",
            self.store.path().display()
        );
        let count = self.store.replace_table(&self.table, &items)?;
        log::info!("Data loaded into table: {}", self.table);
        Ok(count)
    }
}
