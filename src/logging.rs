//! Log destination and subscriber setup.

use crate::error::{DynDnsError, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// Timestamp layout used for file logs.
const FILE_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogDestination {
    /// Standard output, without timestamps.
    #[default]
    Stdout,
    /// Append to a file, one timestamped line per event.
    File(PathBuf),
}

fn open_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Open a log file for appending, creating it if needed.
pub fn open_log_file(path: &Path) -> Result<File> {
    open_append(path).map_err(DynDnsError::LogFile)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber for `destination`. Call once at startup.
pub fn init(destination: &LogDestination) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_level(false)
        .with_target(false);

    let installed = match destination {
        LogDestination::Stdout => builder.without_time().try_init(),
        LogDestination::File(path) => {
            let file = open_log_file(path)?;
            builder
                .with_timer(ChronoLocal::new(FILE_TIME_FORMAT.to_string()))
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    installed.map_err(|e| DynDnsError::Logging(e.to_string()))
}

fn fatal_record(destination: &LogDestination, line: &str) -> String {
    match destination {
        LogDestination::Stdout => format!("{}\n", line),
        LogDestination::File(_) => format!(
            "{} {}\n",
            chrono::Local::now().format(FILE_TIME_FORMAT),
            line
        ),
    }
}

/// Write the line a run aborts with, regardless of the active filter.
///
/// Falls back to stderr when the log file cannot be written.
pub fn report_fatal(destination: &LogDestination, line: &str) {
    let record = fatal_record(destination, line);
    let written = match destination {
        LogDestination::Stdout => std::io::stdout().write_all(record.as_bytes()),
        LogDestination::File(path) => {
            open_append(path).and_then(|mut file| file.write_all(record.as_bytes()))
        }
    };
    if written.is_err() {
        eprintln!("{}", line);
    }
}
