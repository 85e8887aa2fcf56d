//! Pixel-space geometry used by the renderer.
//!
//! Coordinates are floating point pixels with the origin at the top-left of
//! the window. Backends that draw on a coarser grid (terminal cells) map these
//! rectangles onto their own units.

/// A 2D size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Size {
    /// Creates a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle at a position with the given size.
    #[inline]
    pub const fn from_origin(x: f32, y: f32, size: Size) -> Self {
        Self::new(x, y, size.width, size.height)
    }
}
