//! Pipeline orchestration for the staging job

use super::{Extractor, Loader};
use crate::config::EtlConfig;
use crate::error::EtlError;
use crate::model::{CustomerRecord, TransactionRecord};
use crate::storage::{
    CsvReader, SchemaStatus, SqliteLoader, SqliteStore, TableName, TableSnapshot,
};
use crate::transform::StagingTransform;

use eyre::Result;

/// What a successful run did
#[derive(Debug, Clone, PartialEq)]
pub struct StagingReport {
    pub customers_read: usize,
    pub transactions_read: usize,
    pub schema: SchemaStatus,
    pub loaded: usize,
    pub snapshot: TableSnapshot,
}

/// Staging pipeline: CSV sources → transform → SQLite staging table
///
/// # Example
/// ```no_run
/// use txn_stager::config::EtlConfig;
/// use txn_stager::etl::StagingPipeline;
///
/// # fn example() -> eyre::Result<()> {
/// let pipeline = StagingPipeline::from_config(&EtlConfig::default())?;
/// let report = pipeline.run()?;
/// println!("Loaded {} rows", report.loaded);
/// # Ok(())
/// # }
/// ```
pub struct StagingPipeline {
    customers: CsvReader<CustomerRecord>,
    transactions: CsvReader<TransactionRecord>,
    store: SqliteStore,
    table: TableName,
    transform: StagingTransform,
    sample_size: usize,
}

impl StagingPipeline {
    pub fn new(
        customers: CsvReader<CustomerRecord>,
        transactions: CsvReader<TransactionRecord>,
        store: SqliteStore,
        table: TableName,
        transform: StagingTransform,
    ) -> Self {
        Self {
            customers,
            transactions,
            store,
            table,
            transform,
            sample_size: crate::config::DEFAULT_SAMPLE_SIZE,
        }
    }

    /// Set how many rows are sampled after the load (default: 5)
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn from_config(config: &EtlConfig) -> Result<Self> {
        let table = TableName::new(config.table.clone())?;
        let transform =
            StagingTransform::new(config.run_timestamp()).with_recency_days(config.recency_days);

        Ok(Self::new(
            CsvReader::new(&config.customers_path),
            CsvReader::new(&config.transactions_path),
            SqliteStore::new(&config.database_path),
            table,
            transform,
        )
        .with_sample_size(config.sample_size))
    }

    /// Run the complete pipeline
    ///
    /// Steps:
    /// 1. Check both source files exist, then read them
    /// 2. Make sure the staging table exists
    /// 3. Transform
    /// 4. Replace the staging table and sample it back
    ///
    /// # Errors
    /// Returns an error if any stage fails; nothing is written to the staging
    /// table unless the transform succeeds.
    pub fn run(&self) -> Result<StagingReport> {
        log::info!("Starting ETL pipeline");

        // Extract
        for path in [self.customers.path(), self.transactions.path()] {
            if !path.exists() {
                log::error!("Data file not found: {}", path.display());
                return Err(EtlError::MissingInput {
                    path: path.to_path_buf(),
                }
                .into());
            }
        }
        log::info!("Data files found. Starting data sourcing");
        let customers = self.customers.extract()?;
        let transactions = self.transactions.extract()?;
        log::info!(
            "Data sourced successfully: {} customer(s), {} transaction(s)",
            customers.len(),
            transactions.len()
        );
        let customers_read = customers.len();
        let transactions_read = transactions.len();

        // Schema
        let schema = self.store.ensure_table(&self.table)?;
        match schema {
            SchemaStatus::Created => log::info!(
                "Created table {} in {}",
                self.table,
                self.store.path().display()
            ),
            SchemaStatus::AlreadyPresent => log::info!(
                "Table {} already exists. Skipping creation.",
                self.table
            ),
        }

        // Transform
        log::info!("Starting data transformation");
        let staged = self.transform.apply(customers, transactions)?;
        log::info!("Data transformed successfully: {} row(s)", staged.len());

        // Load
        log::info!("Starting data load");
        let loader = SqliteLoader::new(self.store.clone(), self.table.clone());
        let loaded = loader.load(staged)?;

        // Verify
        let snapshot = self.store.inspect(&self.table, self.sample_size)?;
        log::info!(
            "Number of rows in table {}: {}",
            self.table,
            snapshot.row_count
        );
        log::info!("Sample data from table {}:", self.table);
        log::info!("{}", serde_json::to_string(&snapshot.columns)?);
        for row in &snapshot.sample {
            log::info!("{}", serde_json::to_string(row)?);
        }

        log::info!("ETL pipeline completed");

        Ok(StagingReport {
            customers_read,
            transactions_read,
            schema,
            loaded,
            snapshot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(temp: &TempDir) -> EtlConfig {
        EtlConfig {
            customers_path: temp.path().join("customers.csv"),
            transactions_path: temp.path().join("transactions.csv"),
            database_path: temp.path().join("staging.db"),
            log_dir: temp.path().join("logs"),
            as_of: chrono::NaiveDate::from_ymd_opt(2024, 2, 15),
            ..EtlConfig::default()
        }
    }

    #[test]
    fn test_run() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        std::fs::write(
            &config.customers_path,
            "customer_id,signup_date\n1,2024-01-01\n",
        )
        .unwrap();
        std::fs::write(
            &config.transactions_path,
            "txn_id,customer_id,txn_date,amount\n100,1,2024-02-01,50.0\n",
        )
        .unwrap();

        let report = StagingPipeline::from_config(&config).unwrap().run().unwrap();

        assert_eq!(report.customers_read, 1);
        assert_eq!(report.transactions_read, 1);
        assert_eq!(report.schema, SchemaStatus::Created);
        assert_eq!(report.loaded, 1);
        assert_eq!(report.snapshot.row_count, 1);
    }

    #[test]
    fn test_missing_input_touches_nothing() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        std::fs::write(
            &config.customers_path,
            "customer_id,signup_date\n1,2024-01-01\n",
        )
        .unwrap();

        let err = StagingPipeline::from_config(&config)
            .unwrap()
            .run()
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<EtlError>(),
            Some(EtlError::MissingInput { .. })
        ));
        assert!(!config.database_path.exists());
    }

    #[test]
    fn test_invalid_table_name() {
        let temp = TempDir::new().unwrap();
        let config = EtlConfig {
            table: "stg-transactions".to_string(),
            ..config_in(&temp)
        };

        let err = StagingPipeline::from_config(&config).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<EtlError>(),
            Some(EtlError::InvalidTableName(_))
        ));
    }
}
