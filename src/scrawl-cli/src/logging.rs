//! Log setup.
//!
//! The editor owns the terminal, so logs always go to a file through a
//! non-blocking writer. The returned guard must live until exit so buffered
//! lines are flushed.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::args::{Cli, LogLevel};
use crate::config::APP_DIR;

/// Environment variable holding the default log level.
pub const SCRAWL_LOG_LEVEL_ENV: &str = "SCRAWL_LOG_LEVEL";

/// Keeps the background log writer alive.
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// `<cache dir>/scrawl/scrawl.log`, if the platform has a cache directory.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(APP_DIR).join("scrawl.log"))
}

/// Picks the level: the flag, then `SCRAWL_LOG_LEVEL`, then info.
pub fn resolve_level(flag: Option<LogLevel>, env_value: Option<&str>) -> LogLevel {
    flag.or_else(|| env_value.and_then(LogLevel::from_str_loose))
        .unwrap_or_default()
}

/// Installs the global subscriber described by `cli`.
///
/// Returns `None` when no log location could be determined.
pub fn init(cli: &Cli) -> Result<Option<LogGuard>> {
    if cli.debug {
        return setup_debug_file_logging().map(Some);
    }

    let Some(path) = cli.log_file.clone().or_else(default_log_path) else {
        return Ok(None);
    };
    let env_level = std::env::var(SCRAWL_LOG_LEVEL_ENV).ok();
    let level = resolve_level(cli.log_level, env_level.as_deref());
    setup_file_logging(&path, level).map(Some)
}

/// Set up debug file logging that writes ALL trace-level logs to ./debug.txt.
pub fn setup_debug_file_logging() -> Result<LogGuard> {
    let debug_file_path = std::env::current_dir()?.join("debug.txt");

    let file = File::create(&debug_file_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create debug.txt: {}. Check write permissions.",
            e
        )
    })?;

    let guard = install(file, EnvFilter::new("trace"))?;
    eprintln!(
        "Debug mode enabled: logging to {}",
        debug_file_path.display()
    );
    Ok(guard)
}

/// Appends logs at `level` to `path`. `RUST_LOG` overrides the level.
pub fn setup_file_logging(path: &Path, level: LogLevel) -> Result<LogGuard> {
    let file = open_log_file(path)?;
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::try_from_default_env().context("Invalid RUST_LOG")?
    } else {
        EnvFilter::new(level.as_filter_str())
    };
    install(file, filter)
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

fn install(file: File, filter: EnvFilter) -> Result<LogGuard> {
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(LogGuard { _guard: guard })
}
