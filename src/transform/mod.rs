//! Transform stage of the staging job
//!
//! Turns raw customer and transaction records into staging rows: date
//! parsing, the recency filter, the signup join and the derived
//! `days_since_signup` column.

mod customers;
mod dates;
mod staging;

pub use customers::CustomerIndex;
pub use dates::{parse_timestamp, whole_days};
pub use staging::{
    DEFAULT_RECENCY_DAYS, RecencyFilter, SignupEnricher, StagingTransform, parse_transactions,
};
