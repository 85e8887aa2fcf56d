//! Terminal platform for `Scrawl`.
//!
//! This crate runs the editor inside a terminal, including:
//! - [`TerminalBackend`] trait for terminal operations
//! - [`CrosstermBackend`] implementation using crossterm
//! - [`CellMetrics`] and [`CellFont`] for mapping pixel layout onto cells
//! - [`TerminalWindow`] for double-buffered drawing and event polling
//! - [`translate`] for turning crossterm events into editor events
//!
//! # Example
//!
//! ```no_run
//! use scrawl_engine::{AppLifecycle, EditorConfig, MonotonicClock};
//! use scrawl_terminal::{CellMetrics, TerminalPlatform};
//!
//! let config = EditorConfig::default();
//! let metrics = CellMetrics::for_font(config.font.size, config.render.line_padding);
//! let outcome = AppLifecycle::new(TerminalPlatform::new(metrics), MonotonicClock::new(), config).run();
//! std::process::exit(i32::from(outcome.exit_code()));
//! ```

#![warn(missing_docs)]

mod backend;
mod events;
mod font;
mod platform;
mod window;

pub use backend::{CrosstermBackend, TerminalBackend, restore_terminal};
pub use events::translate;
pub use font::{CellFont, CellImage, CellMetrics, CellRect, Glyph};
pub use platform::TerminalPlatform;
pub use window::TerminalWindow;
