//! [`Platform`] implementation for a real terminal.

use scrawl_core::Result;
use scrawl_engine::{FontSpec, Platform, WindowSpec};

use crate::backend::CrosstermBackend;
use crate::font::{CellFont, CellImage, CellMetrics};
use crate::window::TerminalWindow;

/// Opens the editor on the controlling terminal through crossterm.
#[derive(Debug, Clone, Copy)]
pub struct TerminalPlatform {
    metrics: CellMetrics,
}

impl TerminalPlatform {
    /// Creates a platform mapping pixels to cells with `metrics`.
    ///
    /// Use [`CellMetrics::for_font`] with the configured font size and line
    /// padding so each editor line lands on its own row.
    pub fn new(metrics: CellMetrics) -> Self {
        Self { metrics }
    }
}

impl Platform for TerminalPlatform {
    type Image = CellImage;
    type Font = CellFont;
    type Window = TerminalWindow<CrosstermBackend>;

    fn create_window(&mut self, spec: &WindowSpec) -> Result<Self::Window> {
        TerminalWindow::open(CrosstermBackend::new(), self.metrics, spec)
    }

    fn open_font(&mut self, spec: &FontSpec) -> Result<Self::Font> {
        CellFont::open(spec)
    }
}
