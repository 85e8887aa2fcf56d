//! Platform abstraction.
//!
//! The editor never talks to a windowing, terminal or font library directly.
//! A [`Platform`] hands out a [`Window`] (canvas, text-input control and event
//! source in one) and a [`Font`] whose rasterized images that window can draw.
//! Dropping a font closes it; dropping a window tears it down.

use std::path::PathBuf;
use std::time::Duration;

use scrawl_core::{Color, InputEvent, Rect, Result, Size};

/// Parameters for creating the window and its renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    /// Window title.
    pub title: String,
    /// Requested width in pixels.
    pub width: u32,
    /// Requested height in pixels.
    pub height: u32,
    /// Whether the user may resize the window.
    pub resizable: bool,
}

/// Parameters for opening the font resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSpec {
    /// Font file, or `None` for the platform's built-in face.
    pub path: Option<PathBuf>,
    /// Pixel size of the face.
    pub pixel_size: u32,
}

/// An image produced by [`Font::rasterize`].
pub trait RasterImage {
    /// Returns the image size in pixels.
    fn size(&self) -> Size;
}

/// Drawing operations for one frame.
pub trait Canvas<I> {
    /// Fills the whole frame with `color`.
    fn clear(&mut self, color: Color) -> Result<()>;

    /// Draws a rasterized image into `dest`.
    fn draw_image(&mut self, image: &I, dest: Rect) -> Result<()>;

    /// Fills `rect` with `color`.
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()>;

    /// Shows the frame.
    fn present(&mut self) -> Result<()>;
}

/// Control over text-input mode (committed text fragments).
pub trait TextInput {
    /// Starts delivering [`InputEvent::TextInput`] events.
    fn enable_text_input(&mut self) -> Result<()>;

    /// Stops delivering text-input events.
    fn disable_text_input(&mut self) -> Result<()>;
}

/// Source of input events.
pub trait EventSource {
    /// Waits up to `timeout` for the next event.
    ///
    /// Returns `Ok(None)` when the timeout elapsed without input.
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<InputEvent>>;
}

/// A window together with its renderer.
pub trait Window<I>: Canvas<I> + TextInput + EventSource {}

impl<I, T> Window<I> for T where T: Canvas<I> + TextInput + EventSource {}

/// An open font face.
pub trait Font {
    /// Image type produced by [`rasterize`](Self::rasterize).
    type Image: RasterImage;

    /// Pixel size the font was opened at.
    fn pixel_size(&self) -> u32;

    /// Renders `text` in `color`.
    fn rasterize(&self, text: &str, color: Color) -> Result<Self::Image>;

    /// Measures `text` without rendering it.
    fn measure(&self, text: &str) -> Result<Size>;
}

/// Factory for the window and font resources.
pub trait Platform {
    /// Image type shared by the font and the window.
    type Image: RasterImage;
    /// Font implementation.
    type Font: Font<Image = Self::Image>;
    /// Window implementation.
    type Window: Window<Self::Image>;

    /// Creates the window and its renderer.
    fn create_window(&mut self, spec: &WindowSpec) -> Result<Self::Window>;

    /// Opens the font resource.
    fn open_font(&mut self, spec: &FontSpec) -> Result<Self::Font>;
}
