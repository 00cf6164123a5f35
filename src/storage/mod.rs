//! File and database storage
//!
//! This module handles all I/O at the edges of the job:
//! - CSV source files
//! - The SQLite staging store

mod csv_file;
mod sqlite;

pub use csv_file::CsvReader;
pub use sqlite::{SchemaStatus, SqliteLoader, SqliteStore, TableName, TableSnapshot};
