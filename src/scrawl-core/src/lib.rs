//! Core types for `Scrawl`, a minimal on-screen text editor.
//!
//! - [`buffer`]: the bounded line grid and its cursor
//! - [`dispatch`]: the mapping from input events to buffer edits
//! - [`event`]: platform-neutral input events
//! - [`color`] and [`geometry`]: drawing primitives shared with backends
//! - [`error`]: error types
//!
//! # Examples
//!
//! ```
//! use scrawl_core::{Dispatch, InputDispatcher, InputEvent, Key, TextBuffer};
//!
//! let dispatcher = InputDispatcher::default();
//! let mut buffer = TextBuffer::default();
//!
//! dispatcher.dispatch(&InputEvent::text("hello"), &mut buffer);
//! dispatcher.dispatch(&InputEvent::Key(Key::Enter), &mut buffer);
//!
//! assert_eq!(buffer.line_text(0), "hello");
//! assert_eq!(dispatcher.dispatch(&InputEvent::Quit, &mut buffer), Dispatch::Quit);
//! ```

#![warn(missing_docs)]

pub mod buffer;
pub mod color;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod geometry;

pub use buffer::{
    BufferLimits, Cursor, DEFAULT_LINE_CAPACITY, DEFAULT_MAX_LINES, DEFAULT_PLACEHOLDER,
    LINE_CAPACITY_LIMIT, Line, MAX_LINES_LIMIT, TextBuffer,
};
pub use color::Color;
pub use dispatch::{Dispatch, DispatchMode, InputDispatcher};
pub use error::{CapacityError, ColorParseError, Error, Result};
pub use event::{InputEvent, Key};
pub use geometry::{Rect, Size};
