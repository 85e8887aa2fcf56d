//! Frame rendering and application lifecycle for `Scrawl`.
//!
//! This crate sits between the pure editing model in `scrawl-core` and a
//! concrete backend:
//! - [`platform`]: traits for the window, font and event source
//! - [`render`]: the per-frame renderer and blinking cursor
//! - [`lifecycle`]: the initialize / run / quit state machine
//! - [`config`]: serde-backed editor configuration
//! - [`clock`]: monotonic and manual clocks
//! - [`headless`]: a display-free platform used by tests

#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod headless;
pub mod lifecycle;
pub mod platform;
pub mod render;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{AppMetadata, BufferConfig, EditorConfig, FontConfig, InputConfig, WindowConfig};
pub use lifecycle::{AppContext, AppLifecycle, Failure, LifecycleState, Outcome};
pub use platform::{
    Canvas, EventSource, Font, FontSpec, Platform, RasterImage, TextInput, Window, WindowSpec,
};
pub use render::{CursorPlacement, FrameStats, RenderSettings, Renderer, blink_on};
