//! Per-run log file setup
//!
//! Each run writes `<log_dir>/etl_pipeline_<YYYYMMDD_HHMMSS>.log`, with every
//! line mirrored to stderr.

use chrono::{Local, NaiveDateTime};
use eyre::{Context, Result};
use log::Level;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Log file name for a run started at `started`
pub fn log_file_path(log_dir: &Path, started: NaiveDateTime) -> PathBuf {
    log_dir.join(format!(
        "etl_pipeline_{}.log",
        started.format("%Y%m%d_%H%M%S")
    ))
}

/// One log line: `<target> - <timestamp> - <LEVEL> - <message>`
pub fn format_line(target: &str, at: NaiveDateTime, level: Level, message: &str) -> String {
    format!(
        "{} - {} - {} - {}",
        target,
        at.format("%Y-%m-%d %H:%M:%S,%3f"),
        level,
        message
    )
}

/// Install the process-wide logger
///
/// Call once, before any pipeline component runs; records logged earlier are
/// lost. The level is `info`, or `debug` when `debug` is set; `LOG_LEVEL` in
/// the environment takes precedence. Returns the path of the new log file.
pub fn init(log_dir: &Path, debug: bool) -> Result<PathBuf> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let path = log_file_path(log_dir, Local::now().naive_local());
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;

    let log_level = match debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format(|buf, record| {
            writeln!(
                buf,
                "{}",
                format_line(
                    record.target(),
                    Local::now().naive_local(),
                    record.level(),
                    &record.args().to_string()
                )
            )
        })
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Pipe(Box::new(Tee { file })))
        .try_init()
        .context("Failed to initialize logger")?;

    Ok(path)
}

/// Writes to the log file and echoes to stderr
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        // stderr is best effort; the file is the record
        let _ = io::stderr().write_all(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let _ = io::stderr().flush();
        Ok(())
    }
}
