//! Character-cell "font".
//!
//! A terminal renders glyphs with its own face, so the editor's pixel layout
//! is mapped onto the cell grid instead. [`CellMetrics`] fixes how many pixels
//! one cell stands for. [`CellFont`] measures text in those pixels and
//! "rasterizes" it into a run of glyphs the window copies into its grid.

use std::path::Path;

use scrawl_core::{Color, Error, Rect, Result, Size};
use scrawl_engine::{Font, FontSpec, RasterImage};
use tracing::debug;
use unicode_width::UnicodeWidthChar;

/// Pixel size of one terminal cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellMetrics {
    /// Cell width in pixels.
    pub cell_width: u32,
    /// Cell height in pixels.
    pub cell_height: u32,
}

/// A rectangle in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRect {
    /// Leftmost column.
    pub col: u16,
    /// Top row.
    pub row: u16,
    /// Number of columns covered.
    pub cols: u16,
    /// Number of rows covered.
    pub rows: u16,
}

impl CellMetrics {
    /// Metrics for a font of `pixel_size` laid out with `line_padding` pixels
    /// between lines. One editor line then occupies exactly one row.
    ///
    /// ```
    /// use scrawl_terminal::CellMetrics;
    ///
    /// let metrics = CellMetrics::for_font(20, 4.0);
    /// assert_eq!((metrics.cell_width, metrics.cell_height), (10, 24));
    /// ```
    pub fn for_font(pixel_size: u32, line_padding: f32) -> Self {
        let padding = line_padding.max(0.0).round() as u32;
        Self {
            cell_width: (pixel_size / 2).max(1),
            cell_height: (pixel_size + padding).max(1),
        }
    }

    /// Column containing pixel `x`.
    #[inline]
    pub fn column(&self, x: f32) -> u16 {
        Self::cell_index(x, self.cell_width)
    }

    /// Row containing pixel `y`.
    #[inline]
    pub fn row(&self, y: f32) -> u16 {
        Self::cell_index(y, self.cell_height)
    }

    /// Cells covered by `rect`. Anything non-empty covers at least one cell.
    pub fn span(&self, rect: Rect) -> CellRect {
        CellRect {
            col: self.column(rect.x),
            row: self.row(rect.y),
            cols: Self::cell_count(rect.width, self.cell_width),
            rows: Self::cell_count(rect.height, self.cell_height),
        }
    }

    fn cell_index(pixels: f32, cell: u32) -> u16 {
        if pixels <= 0.0 {
            return 0;
        }
        (pixels / cell as f32).floor().min(f32::from(u16::MAX)) as u16
    }

    fn cell_count(pixels: f32, cell: u32) -> u16 {
        if pixels <= 0.0 {
            return 0;
        }
        (pixels / cell as f32)
            .round()
            .clamp(1.0, f32::from(u16::MAX)) as u16
    }
}

/// One character of a [`CellImage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    /// The character.
    pub ch: char,
    /// Columns it occupies (0, 1 or 2).
    pub width: u8,
}

/// Text laid out for the cell grid.
#[derive(Clone, Debug, PartialEq)]
pub struct CellImage {
    glyphs: Vec<Glyph>,
    color: Color,
    size: Size,
}

impl CellImage {
    /// The glyphs in order.
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Foreground color.
    pub fn color(&self) -> Color {
        self.color
    }
}

impl RasterImage for CellImage {
    fn size(&self) -> Size {
        self.size
    }
}

/// Font backed by the terminal's own face.
#[derive(Debug)]
pub struct CellFont {
    pixel_size: u32,
    metrics: CellMetrics,
}

impl CellFont {
    /// Opens a cell font.
    ///
    /// A configured path must name a readable file even though the terminal
    /// draws with its own face.
    pub fn open(spec: &FontSpec) -> Result<Self> {
        if spec.pixel_size == 0 {
            return Err(Error::Font {
                path: spec.path.clone(),
                reason: "pixel size must be positive".to_string(),
            });
        }
        if let Some(path) = &spec.path {
            check_font_file(path)?;
            debug!(path = %path.display(), "Font file found; terminal face used for drawing");
        }

        Ok(Self {
            pixel_size: spec.pixel_size,
            metrics: CellMetrics::for_font(spec.pixel_size, 0.0),
        })
    }

    fn width_px(&self, columns: usize) -> f32 {
        (columns as u64 * u64::from(self.metrics.cell_width)) as f32
    }
}

fn check_font_file(path: &Path) -> Result<()> {
    let font_error = |reason: String| Error::Font {
        path: Some(path.to_path_buf()),
        reason,
    };
    let metadata = std::fs::metadata(path).map_err(|err| font_error(err.to_string()))?;
    if !metadata.is_file() {
        return Err(font_error("not a regular file".to_string()));
    }
    Ok(())
}

fn glyph_width(ch: char) -> u8 {
    ch.width().map_or(0, |w| w.min(2) as u8)
}

impl Font for CellFont {
    type Image = CellImage;

    fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    fn rasterize(&self, text: &str, color: Color) -> Result<CellImage> {
        if let Some(ch) = text.chars().find(|c| c.is_control()) {
            return Err(Error::Rasterize(format!(
                "control character {ch:?} has no glyph"
            )));
        }

        let glyphs: Vec<Glyph> = text
            .chars()
            .map(|ch| Glyph {
                ch,
                width: glyph_width(ch),
            })
            .collect();
        let columns = glyphs.iter().map(|g| usize::from(g.width)).sum();

        Ok(CellImage {
            glyphs,
            color,
            size: Size::new(self.width_px(columns), self.pixel_size as f32),
        })
    }

    fn measure(&self, text: &str) -> Result<Size> {
        let columns: usize = text.chars().map(|c| usize::from(glyph_width(c))).sum();
        Ok(Size::new(self.width_px(columns), self.pixel_size as f32))
    }
}
