//! Error types for Scrawl operations.

use std::path::PathBuf;

use thiserror::Error;

/// Core error type for platform and configuration failures.
#[derive(Error, Debug)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The window or its renderer could not be created.
    #[error("Couldn't create window/renderer: {0}")]
    Window(String),

    /// The font resource could not be opened.
    #[error("Couldn't open font {}: {reason}", path.as_ref().map_or_else(|| "<builtin>".to_string(), |p| p.display().to_string()))]
    Font {
        /// Path that was requested, if any.
        path: Option<PathBuf>,
        /// Why it failed.
        reason: String,
    },

    /// Text input mode could not be toggled.
    #[error("Couldn't toggle text input: {0}")]
    TextInput(String),

    /// A piece of text could not be rasterized.
    #[error("Couldn't rasterize text: {0}")]
    Rasterize(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias using the core Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Rejection returned when an edit would overflow a line.
///
/// The buffer is left untouched whenever this is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapacityError {
    /// The line would grow past its character limit.
    #[error("line {line} would grow to {requested} chars (limit {limit})")]
    LineFull {
        /// Index of the line that rejected the edit.
        line: usize,
        /// Length the line would have had after the edit.
        requested: usize,
        /// Maximum number of characters the line may hold.
        limit: usize,
    },
}

/// Error type for color parsing operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// Input string was empty.
    #[error("empty input")]
    EmptyInput,

    /// Hex string had an invalid length.
    #[error("invalid hex length: {0} (expected 3, 4, 6, or 8)")]
    InvalidLength(usize),

    /// Invalid hexadecimal character.
    #[error("invalid hex character")]
    InvalidHexChar,
}
