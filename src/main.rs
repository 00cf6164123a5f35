use chrono::NaiveDate;
use clap::{Parser, builder::styling};
use eyre::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;
use txn_stager::{cli, config::EtlConfig, logging};

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Stage the last 90 days of transactions, enriched with customer signup dates, into SQLite
#[derive(Parser)]
#[command(name = "stager", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source STAGER_* settings from
    #[arg(short, long, default_value = ".env")]
    env: PathBuf,

    /// More verbose logging
    #[arg(long)]
    debug: bool,

    /// Customers CSV file [default: customers.csv]
    #[arg(long)]
    customers: Option<PathBuf>,

    /// Transactions CSV file [default: transactions.csv]
    #[arg(long)]
    transactions: Option<PathBuf>,

    /// SQLite database file [default: staging.db]
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Staging table name [default: stg_transactions]
    #[arg(short, long)]
    table: Option<String>,

    /// Directory for per-run log files [default: logs]
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Keep transactions from this many days before the run date [default: 90]
    #[arg(long)]
    recency_days: Option<u32>,

    /// Pin the run date (YYYY-MM-DD) instead of using the current time
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Number of rows to sample back after loading [default: 5]
    #[arg(long)]
    sample_size: Option<usize>,
}

impl Cli {
    /// Defaults, then environment, then flags
    fn resolve(&self) -> Result<EtlConfig> {
        cli::load_dotenv(&self.env)?;
        let mut config = EtlConfig::from_env()?;

        if let Some(path) = &self.customers {
            config.customers_path = path.clone();
        }
        if let Some(path) = &self.transactions {
            config.transactions_path = path.clone();
        }
        if let Some(path) = &self.database {
            config.database_path = path.clone();
        }
        if let Some(table) = &self.table {
            config.table = table.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = dir.clone();
        }
        if let Some(days) = self.recency_days {
            config.recency_days = days;
        }
        if let Some(date) = self.as_of {
            config.as_of = Some(date);
        }
        if let Some(size) = self.sample_size {
            config.sample_size = size;
        }

        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    let log_file = match logging::init(&config.log_dir, cli.debug) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };
    log::debug!("Logging to {}", log_file.display());

    match cli::run_staging(&config) {
        Ok(report) => {
            println!("{}", cli::summary(&config, &report));
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{:#}", e);
            log::error!("Exiting with failure, see {}", log_file.display());
            ExitCode::FAILURE
        }
    }
}
