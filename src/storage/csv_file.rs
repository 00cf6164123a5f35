//! Headered CSV file reading

use crate::error::EtlError;
use crate::etl::Extractor;
use crate::model::SourceRecord;

use eyre::{Context, Result};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Read typed records from a comma-delimited file with a header row
///
/// Columns are matched by header name, so column order in the file does not
/// matter and extra columns are ignored.
pub struct CsvReader<T> {
    path: PathBuf,
    _record: PhantomData<T>,
}

impl<T: SourceRecord> CsvReader<T> {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all records
    pub fn read(&self) -> Result<Vec<T>> {
        if !self.path.exists() {
            return Err(EtlError::MissingInput {
                path: self.path.clone(),
            }
            .into());
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .with_context(|| format!("Failed to open CSV file: {}", self.path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read CSV header: {}", self.path.display()))?;
        for &column in T::COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(EtlError::MissingColumn {
                    dataset: T::DATASET,
                    column,
                }
                .into());
            }
        }

        reader
            .deserialize::<T>()
            .enumerate()
            .map(|(index, row)| {
                row.with_context(|| {
                    format!(
                        "Failed to parse row {} of dataset '{}' ({})",
                        index + 1,
                        T::DATASET,
                        self.path.display()
                    )
                })
            })
            .collect()
    }
}

impl<T: SourceRecord> Extractor for CsvReader<T> {
    type Item = T;

    fn extract(&self) -> Result<Vec<Self::Item>> {
        let records = self.read()?;
        log::debug!(
            "Read {} {} record(s) from {}",
            records.len(),
            T::DATASET,
            self.path.display()
        );
        Ok(records)
    }
}
