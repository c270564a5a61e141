//! Subscriber setup.
//!
//! Filter precedence: `PHOTO_PICKER_LOG`, then `RUST_LOG`, then the
//! `-v`/`-q` flags. Command-line runs write to stderr. The TUI owns the
//! terminal, so it logs to a daily rolling file instead.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV: &str = "PHOTO_PICKER_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verbosity {
    pub verbose: u8,
    pub quiet: bool,
}

impl Verbosity {
    pub fn directive(self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    /// Directory for `photo-picker.log.<date>` files.
    File(PathBuf),
}

pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    [LOG_ENV, EnvFilter::DEFAULT_ENV]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(verbosity.directive()))
}

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the process when logging to a file, or buffered lines are lost.
pub fn init(verbosity: Verbosity, target: LogTarget) -> Result<Option<WorkerGuard>> {
    let filter = env_filter(verbosity);
    match target {
        LogTarget::Stderr => {
            let installed = tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .with(filter)
                .try_init();
            if installed.is_err() {
                tracing::debug!("subscriber already installed");
            }
            Ok(None)
        }
        LogTarget::File(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("creating log dir {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(&dir, "photo-picker.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let installed = tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .try_init();
            if installed.is_err() {
                tracing::debug!("subscriber already installed");
            }
            Ok(Some(guard))
        }
    }
}
