//! Job configuration
//!
//! Built-in defaults, overridden by environment variables (optionally sourced
//! from a dotenv file), overridden in turn by command-line flags.
//!
//! | Variable                  | Default            |
//! |---------------------------|--------------------|
//! | `STAGER_CUSTOMERS_CSV`    | `customers.csv`    |
//! | `STAGER_TRANSACTIONS_CSV` | `transactions.csv` |
//! | `STAGER_DATABASE`         | `staging.db`       |
//! | `STAGER_TABLE`            | `stg_transactions` |
//! | `STAGER_LOG_DIR`          | `logs`             |
//! | `STAGER_RECENCY_DAYS`     | `90`               |
//! | `STAGER_SAMPLE_SIZE`      | `5`                |
//! | `STAGER_AS_OF`            | current time       |

use crate::error::EtlError;
use crate::transform::DEFAULT_RECENCY_DAYS;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_CUSTOMERS_CSV: &str = "customers.csv";
pub const DEFAULT_TRANSACTIONS_CSV: &str = "transactions.csv";
pub const DEFAULT_DATABASE: &str = "staging.db";
pub const DEFAULT_TABLE: &str = "stg_transactions";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct EtlConfig {
    pub customers_path: PathBuf,
    pub transactions_path: PathBuf,
    pub database_path: PathBuf,
    pub table: String,
    pub log_dir: PathBuf,
    pub recency_days: u32,
    pub sample_size: usize,
    /// Pinned run date; `None` means "now"
    pub as_of: Option<NaiveDate>,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            customers_path: PathBuf::from(DEFAULT_CUSTOMERS_CSV),
            transactions_path: PathBuf::from(DEFAULT_TRANSACTIONS_CSV),
            database_path: PathBuf::from(DEFAULT_DATABASE),
            table: DEFAULT_TABLE.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            recency_days: DEFAULT_RECENCY_DAYS,
            sample_size: DEFAULT_SAMPLE_SIZE,
            as_of: None,
        }
    }
}

impl EtlConfig {
    /// Defaults overridden by `STAGER_*` environment variables
    pub fn from_env() -> Result<Self, EtlError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `STAGER_*` key
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EtlError> {
        let mut config = Self::default();

        if let Some(v) = lookup("STAGER_CUSTOMERS_CSV") {
            config.customers_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("STAGER_TRANSACTIONS_CSV") {
            config.transactions_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("STAGER_DATABASE") {
            config.database_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("STAGER_TABLE") {
            config.table = v;
        }
        if let Some(v) = lookup("STAGER_LOG_DIR") {
            config.log_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("STAGER_RECENCY_DAYS") {
            config.recency_days = parse_var("STAGER_RECENCY_DAYS", &v)?;
        }
        if let Some(v) = lookup("STAGER_SAMPLE_SIZE") {
            config.sample_size = parse_var("STAGER_SAMPLE_SIZE", &v)?;
        }
        if let Some(v) = lookup("STAGER_AS_OF") {
            config.as_of = Some(parse_var("STAGER_AS_OF", &v)?);
        }

        Ok(config)
    }

    /// The timestamp the recency cutoff is measured from
    ///
    /// A pinned date means the start of that day; otherwise local time now.
    pub fn run_timestamp(&self) -> NaiveDateTime {
        match self.as_of {
            Some(date) => date.and_time(NaiveTime::MIN),
            None => Local::now().naive_local(),
        }
    }
}

fn parse_var<T: FromStr>(key: &'static str, value: &str) -> Result<T, EtlError> {
    value.trim().parse().map_err(|_| EtlError::InvalidConfig {
        key,
        value: value.to_string(),
    })
}
