//! Diagnostic logging setup.
//!
//! The console owns the terminal, so interactive sessions only log when a file
//! is given with `-l`. One-shot subcommands fall back to stderr.

use std::error::Error;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILTER_ENV: &str = "NMAPAI_LOG";
pub const DEFAULT_LOG_FILTER: &str = "nmapai=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Disabled,
    Stderr,
    File(String),
}

impl LogTarget {
    pub fn select(log_file: Option<String>, interactive: bool) -> Self {
        match log_file {
            Some(path) if !path.trim().is_empty() => LogTarget::File(path),
            _ if interactive => LogTarget::Disabled,
            _ => LogTarget::Stderr,
        }
    }
}

fn build_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

pub fn init_logging(target: LogTarget) -> Result<(), Box<dyn Error>> {
    match target {
        LogTarget::Disabled => {}
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(build_filter())
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
        }
        LogTarget::File(path) => {
            let file = open_log_file(Path::new(&path))
                .map_err(|e| format!("Failed to open log file {path}: {e}"))?;
            tracing_subscriber::registry()
                .with(build_filter())
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()?;
        }
    }
    Ok(())
}
