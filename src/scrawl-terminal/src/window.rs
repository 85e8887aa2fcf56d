//! Terminal window: a double-buffered cell grid behind the canvas traits.
//!
//! Drawing calls only touch the back grid. [`present`](Canvas::present)
//! writes the cells that differ from what is already on screen, then swaps.
//! After a resize (or on the first frame) everything is redrawn.

use std::collections::VecDeque;
use std::time::Duration;

use scrawl_core::{Color, Error, InputEvent, Rect, Result};
use scrawl_engine::{Canvas, EventSource, TextInput, WindowSpec};
use tracing::{debug, trace, warn};

use crate::backend::TerminalBackend;
use crate::events::translate;
use crate::font::{CellImage, CellMetrics};

/// Marks the right half of a double-width glyph.
const CONTINUATION: char = '\0';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    fn blank(bg: Color) -> Self {
        Self {
            ch: ' ',
            fg: Color::WHITE,
            bg,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Grid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Grid {
    fn new(width: u16, height: u16, bg: Color) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::blank(bg); usize::from(width) * usize::from(height)],
        }
    }

    fn fill(&mut self, bg: Color) {
        self.cells.fill(Cell::blank(bg));
    }

    fn get_mut(&mut self, col: u16, row: u16) -> Option<&mut Cell> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let index = usize::from(row) * usize::from(self.width) + usize::from(col);
        self.cells.get_mut(index)
    }
}

/// A terminal presented as a window.
pub struct TerminalWindow<B: TerminalBackend> {
    backend: B,
    metrics: CellMetrics,
    back: Grid,
    front: Grid,
    background: Color,
    full_redraw: bool,
    text_input: bool,
    pending: VecDeque<InputEvent>,
}

impl<B: TerminalBackend> TerminalWindow<B> {
    /// Takes over the terminal: raw mode, alternate screen, hidden cursor
    /// and the window title.
    ///
    /// The terminal keeps its own size; the requested pixel size is only
    /// logged.
    pub fn open(mut backend: B, metrics: CellMetrics, spec: &WindowSpec) -> Result<Self> {
        let window_error = |err: Error| Error::Window(err.to_string());

        backend.enter_raw_mode().map_err(window_error)?;
        backend.enter_alternate_screen().map_err(window_error)?;
        backend.hide_cursor().map_err(window_error)?;
        backend.set_title(&spec.title).map_err(window_error)?;
        let (width, height) = backend.size().map_err(window_error)?;

        debug!(
            title = %spec.title,
            requested_width = spec.width,
            requested_height = spec.height,
            columns = width,
            rows = height,
            "Terminal window opened"
        );

        let background = Color::BLACK;
        Ok(Self {
            backend,
            metrics,
            back: Grid::new(width, height, background),
            front: Grid::new(width, height, background),
            background,
            full_redraw: true,
            text_input: false,
            pending: VecDeque::new(),
        })
    }

    /// Grid size in (columns, rows).
    #[inline]
    pub fn size(&self) -> (u16, u16) {
        (self.back.width, self.back.height)
    }

    /// Returns a reference to the backend.
    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether text-input mode is on.
    #[inline]
    pub fn text_input_enabled(&self) -> bool {
        self.text_input
    }

    /// Character currently in the back grid at (`col`, `row`).
    pub fn char_at(&self, col: u16, row: u16) -> Option<char> {
        self.cell(col, row).map(|cell| cell.ch)
    }

    /// Background color in the back grid at (`col`, `row`).
    pub fn background_at(&self, col: u16, row: u16) -> Option<Color> {
        self.cell(col, row).map(|cell| cell.bg)
    }

    /// Text of one back-grid row, trailing blanks trimmed.
    pub fn row_text(&self, row: u16) -> String {
        (0..self.back.width)
            .filter_map(|col| self.char_at(col, row))
            .filter(|&ch| ch != CONTINUATION)
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.back.width || row >= self.back.height {
            return None;
        }
        self.back
            .cells
            .get(usize::from(row) * usize::from(self.back.width) + usize::from(col))
    }

    /// Resizes both grids and schedules a full redraw.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.back = Grid::new(width, height, self.background);
        self.front = Grid::new(width, height, self.background);
        self.full_redraw = true;
    }

    fn write_cells(&mut self) -> Result<usize> {
        let mut written = 0;
        let mut style: Option<(Color, Color)> = None;

        for row in 0..self.back.height {
            for col in 0..self.back.width {
                let index = usize::from(row) * usize::from(self.back.width) + usize::from(col);
                let cell = self.back.cells[index];
                if cell.ch == CONTINUATION {
                    continue;
                }
                if !self.full_redraw && self.front.cells.get(index) == Some(&cell) {
                    continue;
                }

                if style != Some((cell.fg, cell.bg)) {
                    self.backend.set_foreground(cell.fg)?;
                    self.backend.set_background(cell.bg)?;
                    style = Some((cell.fg, cell.bg));
                }
                self.backend.move_cursor(col, row)?;
                let mut buf = [0u8; 4];
                self.backend.write_str(cell.ch.encode_utf8(&mut buf))?;
                written += 1;
            }
        }
        Ok(written)
    }
}

impl<B: TerminalBackend> Canvas<CellImage> for TerminalWindow<B> {
    fn clear(&mut self, color: Color) -> Result<()> {
        self.background = color;
        self.back.fill(color);
        Ok(())
    }

    fn draw_image(&mut self, image: &CellImage, dest: Rect) -> Result<()> {
        let mut col = self.metrics.column(dest.x);
        let row = self.metrics.row(dest.y);
        if row >= self.back.height {
            return Ok(());
        }

        for glyph in image.glyphs() {
            let width = u16::from(glyph.width);
            if width == 0 {
                continue;
            }
            if col.saturating_add(width) > self.back.width {
                break;
            }
            if let Some(cell) = self.back.get_mut(col, row) {
                cell.ch = glyph.ch;
                cell.fg = image.color();
            }
            if width == 2
                && let Some(cell) = self.back.get_mut(col + 1, row)
            {
                cell.ch = CONTINUATION;
            }
            col += width;
        }
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        let span = self.metrics.span(rect);
        for row in span.row..span.row.saturating_add(span.rows) {
            for col in span.col..span.col.saturating_add(span.cols) {
                if let Some(cell) = self.back.get_mut(col, row) {
                    cell.bg = color;
                }
            }
        }
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        if self.full_redraw {
            self.backend.clear()?;
        }
        let written = self.write_cells()?;
        self.backend.reset_style()?;
        self.backend.flush()?;

        self.front.clone_from(&self.back);
        self.full_redraw = false;
        trace!(cells = written, "Terminal updated");
        Ok(())
    }
}

impl<B: TerminalBackend> TextInput for TerminalWindow<B> {
    fn enable_text_input(&mut self) -> Result<()> {
        self.backend
            .enable_bracketed_paste()
            .map_err(|err| Error::TextInput(err.to_string()))?;
        self.text_input = true;
        Ok(())
    }

    fn disable_text_input(&mut self) -> Result<()> {
        self.text_input = false;
        self.backend
            .disable_bracketed_paste()
            .map_err(|err| Error::TextInput(err.to_string()))
    }
}

impl<B: TerminalBackend> EventSource for TerminalWindow<B> {
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<InputEvent>> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }

        let Some(raw) = self.backend.read_event(timeout)? else {
            return Ok(None);
        };
        for event in translate(raw, self.text_input) {
            if let InputEvent::Resize { width, height } = event {
                let clamp = |v: u32| u16::try_from(v).unwrap_or(u16::MAX);
                self.resize(clamp(width), clamp(height));
            }
            self.pending.push_back(event);
        }
        Ok(self.pending.pop_front())
    }
}

impl<B: TerminalBackend> Drop for TerminalWindow<B> {
    fn drop(&mut self) {
        // Best-effort teardown; the terminal must come back usable.
        let teardown = [
            self.backend.reset_style(),
            self.backend.disable_bracketed_paste(),
            self.backend.show_cursor(),
            self.backend.leave_alternate_screen(),
            self.backend.exit_raw_mode(),
            self.backend.flush(),
        ];
        if let Some(Err(err)) = teardown.into_iter().find(Result::is_err) {
            warn!(%err, "Terminal teardown incomplete");
        }
        debug!("Terminal window closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;
    use scrawl_core::Key;
    use scrawl_engine::{Font, FontSpec};

    use crate::font::CellFont;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        RawMode(bool),
        AltScreen(bool),
        Cursor(bool),
        Title(String),
        Clear,
        Move(u16, u16),
        Write(String),
        Paste(bool),
        Flush,
    }

    #[derive(Default)]
    struct FakeBackend {
        calls: Vec<Call>,
        events: VecDeque<Event>,
        fail_paste: bool,
    }

    impl FakeBackend {
        fn writes(&self) -> Vec<(u16, u16, String)> {
            let mut at = (0, 0);
            let mut out = Vec::new();
            for call in &self.calls {
                match call {
                    Call::Move(x, y) => at = (*x, *y),
                    Call::Write(s) => out.push((at.0, at.1, s.clone())),
                    _ => {}
                }
            }
            out
        }
    }

    impl TerminalBackend for FakeBackend {
        fn enter_raw_mode(&mut self) -> Result<()> {
            self.calls.push(Call::RawMode(true));
            Ok(())
        }
        fn exit_raw_mode(&mut self) -> Result<()> {
            self.calls.push(Call::RawMode(false));
            Ok(())
        }
        fn enter_alternate_screen(&mut self) -> Result<()> {
            self.calls.push(Call::AltScreen(true));
            Ok(())
        }
        fn leave_alternate_screen(&mut self) -> Result<()> {
            self.calls.push(Call::AltScreen(false));
            Ok(())
        }
        fn hide_cursor(&mut self) -> Result<()> {
            self.calls.push(Call::Cursor(false));
            Ok(())
        }
        fn show_cursor(&mut self) -> Result<()> {
            self.calls.push(Call::Cursor(true));
            Ok(())
        }
        fn set_title(&mut self, title: &str) -> Result<()> {
            self.calls.push(Call::Title(title.to_string()));
            Ok(())
        }
        fn move_cursor(&mut self, x: u16, y: u16) -> Result<()> {
            self.calls.push(Call::Move(x, y));
            Ok(())
        }
        fn size(&self) -> Result<(u16, u16)> {
            Ok((20, 4))
        }
        fn clear(&mut self) -> Result<()> {
            self.calls.push(Call::Clear);
            Ok(())
        }
        fn flush(&mut self) -> Result<()> {
            self.calls.push(Call::Flush);
            Ok(())
        }
        fn set_foreground(&mut self, _color: Color) -> Result<()> {
            Ok(())
        }
        fn set_background(&mut self, _color: Color) -> Result<()> {
            Ok(())
        }
        fn reset_style(&mut self) -> Result<()> {
            Ok(())
        }
        fn write_str(&mut self, s: &str) -> Result<()> {
            self.calls.push(Call::Write(s.to_string()));
            Ok(())
        }
        fn enable_bracketed_paste(&mut self) -> Result<()> {
            if self.fail_paste {
                return Err(Error::Io(std::io::Error::other("no paste support")));
            }
            self.calls.push(Call::Paste(true));
            Ok(())
        }
        fn disable_bracketed_paste(&mut self) -> Result<()> {
            self.calls.push(Call::Paste(false));
            Ok(())
        }
        fn read_event(&mut self, _timeout: Duration) -> Result<Option<Event>> {
            Ok(self.events.pop_front())
        }
    }

    fn spec() -> WindowSpec {
        WindowSpec {
            title: "notes".to_string(),
            width: 800,
            height: 600,
            resizable: true,
        }
    }

    fn window(backend: FakeBackend) -> TerminalWindow<FakeBackend> {
        TerminalWindow::open(backend, CellMetrics::for_font(20, 4.0), &spec()).unwrap()
    }

    fn font() -> CellFont {
        CellFont::open(&FontSpec {
            path: None,
            pixel_size: 20,
        })
        .unwrap()
    }

    #[test]
    fn test_open_takes_over_terminal() {
        let window = window(FakeBackend::default());
        assert_eq!(
            window.backend().calls,
            vec![
                Call::RawMode(true),
                Call::AltScreen(true),
                Call::Cursor(false),
                Call::Title("notes".to_string()),
            ]
        );
        assert_eq!(window.size(), (20, 4));
    }

    #[test]
    fn test_lines_map_to_rows() {
        let mut window = window(FakeBackend::default());
        let font = font();
        window.clear(Color::CHARCOAL).unwrap();
        for (line, text) in ["one", "three"].iter().enumerate() {
            let image = font.rasterize(text, Color::WHITE).unwrap();
            let dest = Rect::new(10.0, 20.0 + 24.0 * line as f32, 0.0, 20.0);
            window.draw_image(&image, dest).unwrap();
        }
        assert_eq!(window.row_text(0), " one");
        assert_eq!(window.row_text(1), " three");
        assert_eq!(window.row_text(2), "");
    }

    #[test]
    fn test_draw_clips_at_right_edge() {
        let mut window = window(FakeBackend::default());
        let image = font()
            .rasterize("abcdefghijklmnopqrstuvwxyz", Color::WHITE)
            .unwrap();
        window
            .draw_image(&image, Rect::new(10.0, 0.0, 260.0, 20.0))
            .unwrap();
        assert_eq!(window.row_text(0), " abcdefghijklmnopqrs");

        let wide = font().rasterize("界界", Color::WHITE).unwrap();
        window
            .draw_image(&wide, Rect::new(170.0, 24.0, 40.0, 20.0))
            .unwrap();
        assert_eq!(window.char_at(17, 1), Some('界'));
        assert_eq!(window.char_at(19, 1), Some(' '));

        window
            .draw_image(&image, Rect::new(0.0, 24.0 * 10.0, 10.0, 20.0))
            .unwrap();
    }

    #[test]
    fn test_fill_rect_paints_cursor_cell() {
        let mut window = window(FakeBackend::default());
        window.clear(Color::CHARCOAL).unwrap();
        window
            .fill_rect(Rect::new(30.0, 44.0, 2.0, 20.0), Color::WHITE)
            .unwrap();
        assert_eq!(window.background_at(3, 1), Some(Color::WHITE));
        assert_eq!(window.background_at(4, 1), Some(Color::CHARCOAL));
        assert_eq!(window.background_at(3, 2), Some(Color::CHARCOAL));
    }

    #[test]
    fn test_present_writes_only_changed_cells() {
        let mut window = window(FakeBackend::default());
        let font = font();
        window.clear(Color::CHARCOAL).unwrap();
        window.present().unwrap();
        assert!(window.backend().calls.contains(&Call::Clear));
        assert_eq!(window.backend().writes().len(), 80);

        window.backend.calls.clear();
        window.clear(Color::CHARCOAL).unwrap();
        let image = font.rasterize("hi", Color::WHITE).unwrap();
        window
            .draw_image(&image, Rect::new(10.0, 44.0, 20.0, 20.0))
            .unwrap();
        window.present().unwrap();

        assert!(!window.backend().calls.contains(&Call::Clear));
        assert_eq!(
            window.backend().writes(),
            vec![(1, 1, "h".to_string()), (2, 1, "i".to_string())]
        );
        assert_eq!(window.backend().calls.last(), Some(&Call::Flush));

        window.backend.calls.clear();
        window.clear(Color::CHARCOAL).unwrap();
        window
            .draw_image(&image, Rect::new(10.0, 44.0, 20.0, 20.0))
            .unwrap();
        window.present().unwrap();
        assert!(window.backend().writes().is_empty());
    }

    #[test]
    fn test_resize_event_forces_full_redraw() {
        let backend = FakeBackend {
            events: VecDeque::from([Event::Resize(5, 2)]),
            ..FakeBackend::default()
        };
        let mut window = window(backend);
        window.present().unwrap();
        window.backend.calls.clear();

        assert_eq!(
            window.poll_event(Duration::ZERO).unwrap(),
            Some(InputEvent::Resize {
                width: 5,
                height: 2,
            })
        );
        assert_eq!(window.size(), (5, 2));

        window.present().unwrap();
        assert!(window.backend().calls.contains(&Call::Clear));
        assert_eq!(window.backend().writes().len(), 10);
    }

    #[test]
    fn test_paste_is_queued_across_polls() {
        let backend = FakeBackend {
            events: VecDeque::from([Event::Paste("a\nb".to_string())]),
            ..FakeBackend::default()
        };
        let mut window = window(backend);
        window.enable_text_input().unwrap();

        let mut polled = Vec::new();
        while let Some(event) = window.poll_event(Duration::ZERO).unwrap() {
            polled.push(event);
        }
        assert_eq!(
            polled,
            vec![
                InputEvent::text("a"),
                InputEvent::Key(Key::Enter),
                InputEvent::text("b"),
            ]
        );
    }

    #[test]
    fn test_key_without_text_input_is_raw() {
        let backend = FakeBackend {
            events: VecDeque::from([Event::Key(KeyEvent::new(
                KeyCode::Char('z'),
                KeyModifiers::NONE,
            ))]),
            ..FakeBackend::default()
        };
        let mut window = window(backend);
        assert_eq!(
            window.poll_event(Duration::ZERO).unwrap(),
            Some(InputEvent::Key(Key::Char('z')))
        );
        assert_eq!(window.poll_event(Duration::ZERO).unwrap(), None);
    }

    #[test]
    fn test_renderer_output_lands_on_grid() {
        use scrawl_core::{BufferLimits, TextBuffer};
        use scrawl_engine::{RenderSettings, Renderer};

        let mut window = window(FakeBackend::default());
        let mut buffer = TextBuffer::with_placeholder(BufferLimits::default(), "hello");
        buffer.newline();
        buffer.append_text("ok").unwrap();

        let stats = Renderer::new(RenderSettings::default())
            .render(&mut window, &font(), &buffer, 0)
            .unwrap();

        assert_eq!(stats.lines_drawn, 2);
        assert_eq!(window.row_text(0), " hello");
        assert_eq!(window.row_text(1), " ok");
        // Cursor sits right after "ok".
        assert_eq!(window.background_at(3, 1), Some(Color::WHITE));
        assert_eq!(window.background_at(2, 1), Some(Color::CHARCOAL));
    }

    #[test]
    fn test_text_input_failure_maps_error() {
        let mut window = window(FakeBackend {
            fail_paste: true,
            ..FakeBackend::default()
        });
        let err = window.enable_text_input().unwrap_err();
        assert!(matches!(err, Error::TextInput(_)));
        assert!(!window.text_input_enabled());
    }
}
