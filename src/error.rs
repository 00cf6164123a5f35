//! Fatal conditions recognised by the staging job
//!
//! Everything here aborts the run. Store and I/O failures are not listed;
//! they travel as plain `eyre::Report`s with context attached.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EtlError {
    /// A source file does not exist
    #[error("Input file not found: {}", path.display())]
    MissingInput { path: PathBuf },

    /// A source file lacks one of the expected header columns
    #[error("Dataset '{dataset}' is missing required column '{column}'")]
    MissingColumn {
        dataset: &'static str,
        column: &'static str,
    },

    /// A date column holds a value that cannot be parsed
    #[error("Error converting {column} to a date in dataset '{dataset}' (row {row}): {value:?}")]
    DateParse {
        dataset: &'static str,
        column: &'static str,
        row: usize,
        value: String,
    },

    /// Nothing survived the recency filter
    #[error("No data to load after transformation (no transactions on or after {cutoff})")]
    EmptyResult { cutoff: chrono::NaiveDateTime },

    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidConfig { key: &'static str, value: String },
}
