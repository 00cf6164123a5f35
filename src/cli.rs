//! CLI helper functions

use crate::config::EtlConfig;
use crate::etl::{StagingPipeline, StagingReport};
use crate::storage::SchemaStatus;

use eyre::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;

/// Source a dotenv file into the environment, if it exists
///
/// Returns whether a file was loaded.
pub fn load_dotenv(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match dotenvy::from_filename(path) {
        Ok(_) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to load env file: {}", path.display())),
    }
}

/// Run the staging pipeline described by `config`
pub fn run_staging(config: &EtlConfig) -> Result<StagingReport> {
    log::debug!("Configuration: {:?}", config);
    log::info!(
        "Staging {} and {} into {} ({})",
        config.customers_path.display(),
        config.transactions_path.display(),
        config.table,
        config.database_path.display()
    );

    let pipeline = StagingPipeline::from_config(config)?;
    pipeline.run()
}

/// One-line terminal summary of a successful run
pub fn summary(config: &EtlConfig, report: &StagingReport) -> String {
    let schema = match report.schema {
        SchemaStatus::Created => "created",
        SchemaStatus::AlreadyPresent => "existing",
    };
    format!(
        "{} Staged {} of {} transaction(s) into {} table {} ({})",
        "✓".green(),
        report.loaded.cyan(),
        report.transactions_read,
        schema,
        config.table.bold(),
        config.database_path.display().bright_black()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_dotenv_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(!load_dotenv(temp.path().join(".env")).unwrap());
    }

    #[test]
    fn test_load_dotenv() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env");
        std::fs::write(&path, "TXN_STAGER_CLI_TEST_VAR=loaded\n").unwrap();

        assert!(load_dotenv(&path).unwrap());
        assert_eq!(
            std::env::var("TXN_STAGER_CLI_TEST_VAR").as_deref(),
            Ok("loaded")
        );
    }
}
