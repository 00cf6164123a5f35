//! Record types flowing through the staging job

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// A record type read from a headered CSV file
///
/// `COLUMNS` lists the headers that must be present; extra columns are ignored.
pub trait SourceRecord: serde::de::DeserializeOwned {
    /// Dataset name used in logs and errors
    const DATASET: &'static str;

    /// Header columns the file must carry
    const COLUMNS: &'static [&'static str];
}

/// One row of the customers dataset
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: i64,
    pub signup_date: String,
}

impl SourceRecord for CustomerRecord {
    const DATASET: &'static str = "customers";
    const COLUMNS: &'static [&'static str] = &["customer_id", "signup_date"];
}

/// One row of the transactions dataset
///
/// A blank `customer_id` or `amount` cell reads as `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionRecord {
    pub txn_id: i64,
    pub customer_id: Option<i64>,
    pub txn_date: String,
    pub amount: Option<f64>,
}

impl SourceRecord for TransactionRecord {
    const DATASET: &'static str = "transactions";
    const COLUMNS: &'static [&'static str] = &["txn_id", "customer_id", "txn_date", "amount"];
}

/// A transaction whose `txn_date` has been parsed
#[derive(Debug, Clone, PartialEq)]
pub struct DatedTransaction {
    pub txn_id: i64,
    pub customer_id: Option<i64>,
    pub txn_date: NaiveDateTime,
    pub amount: Option<f64>,
}

/// A row of the staging table
///
/// Field order is the table's column order.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedTransaction {
    pub txn_id: i64,
    pub customer_id: Option<i64>,
    pub txn_date: NaiveDate,
    pub amount: Option<f64>,
    pub signup_date: Option<NaiveDate>,
    pub days_since_signup: Option<i64>,
}

impl StagedTransaction {
    /// Staging table columns, in storage order
    pub const COLUMNS: [&'static str; 6] = [
        "txn_id",
        "customer_id",
        "txn_date",
        "amount",
        "signup_date",
        "days_since_signup",
    ];
}
