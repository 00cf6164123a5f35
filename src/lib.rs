//! Transaction Stager
//!
//! A batch ETL job: reads customer and transaction CSV files, keeps the
//! recent transactions, joins in each customer's signup date, derives
//! `days_since_signup` and replaces a SQLite staging table with the result.

pub mod cli;
pub mod config;
pub mod error;
pub mod etl;
pub mod logging;
pub mod model;
pub mod storage;
pub mod transform;

// Re-exports for convenience
pub use config::EtlConfig;
pub use error::EtlError;
pub use etl::{Extractor, Loader, StagingPipeline, StagingReport, Transformer};
pub use model::{CustomerRecord, StagedTransaction, TransactionRecord};
pub use storage::{CsvReader, SqliteLoader, SqliteStore, TableName};
