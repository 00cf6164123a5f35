//! Extractor trait for data extraction from various sources

use eyre::Result;

/// Extractor trait for extracting data from a source
///
/// Implementors define how to read items from a source such as a CSV file
/// or a database table. Extraction is synchronous and reads the whole source
/// into memory.
///
/// # Example
/// ```no_run
/// use txn_stager::etl::Extractor;
/// use eyre::Result;
/// use std::path::PathBuf;
///
/// struct LineExtractor {
///     path: PathBuf,
/// }
///
/// impl Extractor for LineExtractor {
///     type Item = String;
///
///     fn extract(&self) -> Result<Vec<Self::Item>> {
///         let content = std::fs::read_to_string(&self.path)?;
///         Ok(content.lines().map(str::to_string).collect())
///     }
/// }
/// ```
pub trait Extractor {
    /// The type of items extracted
    type Item;

    /// Extract items from the source
    ///
    /// # Errors
    /// Returns an error if extraction fails (missing file, I/O, parsing, etc.)
    fn extract(&self) -> Result<Vec<Self::Item>>;
}
