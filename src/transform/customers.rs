//! Customer lookup used by the signup join

use super::dates::parse_column;
use crate::error::EtlError;
use crate::model::{CustomerRecord, SourceRecord};

use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Parsed signup timestamps keyed by `customer_id`
///
/// Keys are unique: the first record for an id wins and later duplicates are
/// ignored, so joining against the index never fans a transaction out. A
/// customer with a blank `signup_date` is indexed with no signup.
#[derive(Debug, Default)]
pub struct CustomerIndex {
    signups: HashMap<i64, Option<NaiveDateTime>>,
}

impl CustomerIndex {
    /// Build the index, parsing every `signup_date`
    ///
    /// # Errors
    /// Fails on the first unparseable `signup_date`, duplicates included.
    /// Blank values are not errors.
    pub fn build(records: Vec<CustomerRecord>) -> Result<Self, EtlError> {
        let mut signups = HashMap::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            let signup = parse_column(
                CustomerRecord::DATASET,
                "signup_date",
                index + 1,
                &record.signup_date,
            )?;

            match signups.entry(record.customer_id) {
                Entry::Vacant(slot) => {
                    slot.insert(signup);
                }
                Entry::Occupied(_) => {
                    log::warn!(
                        "Duplicate customer_id {} at row {}, keeping the first record",
                        record.customer_id,
                        index + 1
                    );
                }
            }
        }

        Ok(Self { signups })
    }

    /// Signup timestamp of a known customer with a non-blank `signup_date`
    pub fn signup(&self, customer_id: i64) -> Option<NaiveDateTime> {
        self.signups.get(&customer_id).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.signups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signups.is_empty()
    }
}
