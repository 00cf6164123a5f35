//! Staging transform: parse, filter, join, derive
//!
//! ```text
//! customers ──parse──▶ CustomerIndex ─────────────┐
//!                                                 ▼
//! transactions ──parse──▶ RecencyFilter ──▶ SignupEnricher ──▶ staged rows
//! ```

use super::customers::CustomerIndex;
use super::dates::{parse_column, whole_days};
use crate::error::EtlError;
use crate::etl::Transformer;
use crate::model::{
    CustomerRecord, DatedTransaction, SourceRecord, StagedTransaction, TransactionRecord,
};

use chrono::{NaiveDateTime, TimeDelta};
use eyre::Result;

/// Default look-back window for the recency filter
pub const DEFAULT_RECENCY_DAYS: u32 = 90;

/// Parse `txn_date` on every transaction, failing on the first bad value
///
/// Rows with a blank `txn_date` are left out: a missing date can never be on
/// or after the recency cutoff.
pub fn parse_transactions(
    records: Vec<TransactionRecord>,
) -> Result<Vec<DatedTransaction>, EtlError> {
    let mut dated = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let parsed = parse_column(
            TransactionRecord::DATASET,
            "txn_date",
            index + 1,
            &record.txn_date,
        )?;
        match parsed {
            Some(txn_date) => dated.push(DatedTransaction {
                txn_id: record.txn_id,
                customer_id: record.customer_id,
                txn_date,
                amount: record.amount,
            }),
            None => log::debug!("txn_id {} has no txn_date", record.txn_id),
        }
    }

    Ok(dated)
}

/// Keeps transactions dated on or after a cutoff
#[derive(Debug, Clone, Copy)]
pub struct RecencyFilter {
    cutoff: NaiveDateTime,
}

impl RecencyFilter {
    pub fn new(cutoff: NaiveDateTime) -> Self {
        Self { cutoff }
    }

    /// Filter keeping the `days` before `as_of`
    pub fn days_before(as_of: NaiveDateTime, days: u32) -> Self {
        let cutoff = as_of
            .checked_sub_signed(TimeDelta::days(i64::from(days)))
            .unwrap_or(NaiveDateTime::MIN);
        Self::new(cutoff)
    }

    pub fn cutoff(&self) -> NaiveDateTime {
        self.cutoff
    }

    pub fn is_recent(&self, txn: &DatedTransaction) -> bool {
        txn.txn_date >= self.cutoff
    }

    pub fn retain(&self, mut transactions: Vec<DatedTransaction>) -> Vec<DatedTransaction> {
        transactions.retain(|txn| self.is_recent(txn));
        transactions
    }
}

/// Left-joins signup dates onto transactions and derives `days_since_signup`
///
/// Every input transaction yields exactly one staged row; an unknown or blank
/// `customer_id` leaves the signup columns null.
pub struct SignupEnricher<'a> {
    customers: &'a CustomerIndex,
}

impl<'a> SignupEnricher<'a> {
    pub fn new(customers: &'a CustomerIndex) -> Self {
        Self { customers }
    }
}

impl Transformer for SignupEnricher<'_> {
    type Input = DatedTransaction;
    type Output = StagedTransaction;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        let signup = input
            .customer_id
            .and_then(|customer_id| self.customers.signup(customer_id));
        // Difference is taken on full timestamps, before truncating to dates.
        let days_since_signup = signup.map(|signup| whole_days(input.txn_date - signup));

        Ok(StagedTransaction {
            txn_id: input.txn_id,
            customer_id: input.customer_id,
            txn_date: input.txn_date.date(),
            amount: input.amount,
            signup_date: signup.map(|ts| ts.date()),
            days_since_signup,
        })
    }
}

/// The full transform from source records to staging rows
#[derive(Debug, Clone, Copy)]
pub struct StagingTransform {
    as_of: NaiveDateTime,
    recency_days: u32,
}

impl StagingTransform {
    pub fn new(as_of: NaiveDateTime) -> Self {
        Self {
            as_of,
            recency_days: DEFAULT_RECENCY_DAYS,
        }
    }

    /// Set the look-back window (default: 90 days)
    pub fn with_recency_days(mut self, days: u32) -> Self {
        self.recency_days = days;
        self
    }

    pub fn filter(&self) -> RecencyFilter {
        RecencyFilter::days_before(self.as_of, self.recency_days)
    }

    /// Produce the staging rows
    ///
    /// # Errors
    /// - [`EtlError::DateParse`] for any unparseable, non-blank date in either
    ///   dataset
    /// - [`EtlError::EmptyResult`] when no transaction passes the filter
    pub fn apply(
        &self,
        customers: Vec<CustomerRecord>,
        transactions: Vec<TransactionRecord>,
    ) -> Result<Vec<StagedTransaction>> {
        let index = CustomerIndex::build(customers)?;
        log::debug!("Indexed {} customer(s)", index.len());

        let total = transactions.len();
        let dated = parse_transactions(transactions)?;

        let filter = self.filter();
        let recent = filter.retain(dated);
        log::info!(
            "Kept {} of {} transaction(s) dated on or after {}",
            recent.len(),
            total,
            filter.cutoff()
        );

        if recent.is_empty() {
            return Err(EtlError::EmptyResult {
                cutoff: filter.cutoff(),
            }
            .into());
        }

        let staged = SignupEnricher::new(&index).transform_many(recent)?;
        let unmatched = staged.iter().filter(|row| row.signup_date.is_none()).count();
        if unmatched > 0 {
            log::info!("{} staged transaction(s) have no matching customer", unmatched);
        }

        Ok(staged)
    }
}
