//! Per-frame renderer.
//!
//! Each frame clears to the background, draws every non-empty line from the
//! top through the cursor line, overlays the blinking cursor and presents.
//! The renderer only reads the buffer. Rasterized images live for a single
//! loop iteration.

use scrawl_core::{Color, Rect, Result, TextBuffer};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::platform::{Canvas, Font, RasterImage};

/// Length of one full blink cycle.
pub const BLINK_PERIOD_MS: u64 = 1000;

/// Portion of the cycle during which the cursor is shown.
pub const BLINK_ON_MS: u64 = 500;

/// Returns true if the cursor is visible at `millis`.
///
/// ```
/// use scrawl_engine::render::blink_on;
///
/// assert!(blink_on(1_499));
/// assert!(!blink_on(1_500));
/// ```
#[inline]
pub fn blink_on(millis: u64) -> bool {
    millis % BLINK_PERIOD_MS < BLINK_ON_MS
}

/// How the cursor's horizontal position is derived from its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorPlacement {
    /// Right after the rendered width of the text before the cursor.
    #[default]
    Measured,
    /// `font_size * (column + origin_x)`. Ignores glyph widths and lands far
    /// to the right of the text; kept for compatibility with older builds.
    Legacy,
}

/// Colors and metrics used when drawing a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Frame background.
    pub background: Color,
    /// Text color.
    pub foreground: Color,
    /// Cursor bar color.
    pub cursor_color: Color,
    /// Left margin of every line.
    pub origin_x: f32,
    /// Top margin of the first line.
    pub origin_y: f32,
    /// Gap added below each line on top of the font size.
    pub line_padding: f32,
    /// Width of the cursor bar.
    pub cursor_width: f32,
    /// Cursor x-position strategy.
    pub cursor_placement: CursorPlacement,
    /// Frames per second.
    pub fps: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            background: Color::CHARCOAL,
            foreground: Color::WHITE,
            cursor_color: Color::WHITE,
            origin_x: 10.0,
            origin_y: 20.0,
            line_padding: 4.0,
            cursor_width: 2.0,
            cursor_placement: CursorPlacement::Measured,
            fps: 60,
        }
    }
}

impl RenderSettings {
    /// Milliseconds between frames.
    pub fn frame_interval_ms(&self) -> u64 {
        1000 / u64::from(self.fps.max(1))
    }
}

/// What happened while drawing one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Lines that were rasterized and drawn.
    pub lines_drawn: usize,
    /// Non-empty lines that failed to rasterize or draw.
    pub lines_skipped: usize,
    /// Whether the cursor bar was drawn.
    pub cursor_visible: bool,
}

/// Draws the buffer.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    settings: RenderSettings,
}

impl Renderer {
    /// Creates a renderer with the given settings.
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    /// Returns the settings.
    #[inline]
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Vertical distance between consecutive lines.
    #[inline]
    pub fn line_advance(&self, font_px: u32) -> f32 {
        font_px as f32 + self.settings.line_padding
    }

    /// Top edge of line `index`.
    #[inline]
    pub fn line_top(&self, index: usize, font_px: u32) -> f32 {
        self.settings.origin_y + index as f32 * self.line_advance(font_px)
    }

    /// Where the cursor bar goes, or `None` if its position can't be measured.
    pub fn cursor_rect<F: Font>(&self, buffer: &TextBuffer, font: &F) -> Option<Rect> {
        let cursor = buffer.cursor();
        let font_px = font.pixel_size();
        let x = match self.settings.cursor_placement {
            CursorPlacement::Measured => {
                let prefix = buffer.active_line().prefix(cursor.column);
                match font.measure(prefix) {
                    Ok(size) => self.settings.origin_x + size.width,
                    Err(err) => {
                        warn!(%err, "Couldn't measure cursor position");
                        return None;
                    }
                }
            }
            CursorPlacement::Legacy => {
                font_px as f32 * (cursor.column as f32 + self.settings.origin_x)
            }
        };
        Some(Rect::new(
            x,
            self.line_top(cursor.line, font_px),
            self.settings.cursor_width,
            font_px as f32,
        ))
    }

    /// Draws and presents one frame.
    ///
    /// A line that fails to rasterize or draw is skipped for this frame only.
    /// Errors from clearing or presenting are returned.
    pub fn render<C, F>(
        &self,
        canvas: &mut C,
        font: &F,
        buffer: &TextBuffer,
        now_millis: u64,
    ) -> Result<FrameStats>
    where
        C: Canvas<F::Image> + ?Sized,
        F: Font,
    {
        let mut stats = FrameStats::default();
        let font_px = font.pixel_size();

        canvas.clear(self.settings.background)?;

        for (index, line) in buffer.visible_lines() {
            if line.is_empty() {
                continue;
            }

            let image = match font.rasterize(line.as_str(), self.settings.foreground) {
                Ok(image) => image,
                Err(err) => {
                    warn!(line = index, %err, "Skipping line");
                    stats.lines_skipped += 1;
                    continue;
                }
            };

            let dest = Rect::from_origin(
                self.settings.origin_x,
                self.line_top(index, font_px),
                image.size(),
            );
            match canvas.draw_image(&image, dest) {
                Ok(()) => stats.lines_drawn += 1,
                Err(err) => {
                    warn!(line = index, %err, "Skipping line");
                    stats.lines_skipped += 1;
                }
            }
        }

        if blink_on(now_millis)
            && let Some(rect) = self.cursor_rect(buffer, font)
        {
            canvas.fill_rect(rect, self.settings.cursor_color)?;
            stats.cursor_visible = true;
        }

        canvas.present()?;
        trace!(?stats, "Frame presented");
        Ok(stats)
    }
}
