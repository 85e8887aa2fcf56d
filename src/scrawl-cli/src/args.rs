//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Log verbosity level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Only show errors
    Error,
    /// Show warnings and errors
    Warn,
    /// Show informational messages, warnings, and errors (default)
    #[default]
    Info,
    /// Show debug messages and above
    Debug,
    /// Show all messages including trace-level details
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter string.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<LogLevel> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// Scrawl - type lines of text in the terminal.
///
/// Enter starts a new line, Backspace deletes within the current line, and
/// Ctrl+Q (or Ctrl+C / Ctrl+D) quits.
#[derive(Parser, Debug, Default)]
#[command(name = "scrawl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (default: <config dir>/scrawl/config.toml)
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Font file to open
    #[arg(long, value_name = "FILE", help_heading = "Editor")]
    pub font: Option<PathBuf>,

    /// Font pixel size
    #[arg(long, value_name = "PX", help_heading = "Editor")]
    pub font_size: Option<u32>,

    /// Deliver raw key presses instead of committed text
    #[arg(long, default_value_t = false, help_heading = "Editor")]
    pub raw_keys: bool,

    /// Frames per second
    #[arg(long, value_name = "N", help_heading = "Editor")]
    pub fps: Option<u32>,

    /// Print the effective configuration as TOML and exit
    #[arg(long, default_value_t = false)]
    pub print_config: bool,

    /// Log level (overrides SCRAWL_LOG_LEVEL; RUST_LOG overrides both)
    #[arg(long, value_enum, help_heading = "Logging")]
    pub log_level: Option<LogLevel>,

    /// Log file (default: <cache dir>/scrawl/scrawl.log)
    #[arg(long, value_name = "FILE", help_heading = "Logging")]
    pub log_file: Option<PathBuf>,

    /// Write trace-level logs to ./debug.txt
    #[arg(long, default_value_t = false, help_heading = "Logging")]
    pub debug: bool,
}
