//! In-memory platform.
//!
//! [`HeadlessPlatform`] replays a scripted list of events and records every
//! resource and draw call into a shared [`Journal`]. Once the script runs out
//! it delivers [`InputEvent::Quit`]. Individual acquisitions and draw calls
//! can be made to fail through [`FailurePlan`].
//!
//! ```
//! use scrawl_core::InputEvent;
//! use scrawl_engine::headless::HeadlessPlatform;
//! use scrawl_engine::{AppLifecycle, EditorConfig, ManualClock};
//!
//! let platform = HeadlessPlatform::new([InputEvent::text("!")]);
//! let journal = platform.journal();
//! let outcome = AppLifecycle::new(platform, ManualClock::default(), EditorConfig::default()).run();
//!
//! assert!(outcome.is_success());
//! assert!(journal.frames().len() >= 1);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use scrawl_core::{Color, Error, InputEvent, Rect, Result, Size};

use crate::clock::ManualClock;
use crate::platform::{
    Canvas, EventSource, Font, FontSpec, Platform, RasterImage, TextInput, WindowSpec,
};

/// One call on a headless canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Frame cleared.
    Clear(Color),
    /// Text image drawn.
    Image {
        /// Rasterized text.
        text: String,
        /// Destination rectangle.
        dest: Rect,
        /// Text color.
        color: Color,
    },
    /// Rectangle filled.
    FillRect {
        /// Filled area.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// Frame presented.
    Present,
}

/// Something the headless platform observed.
#[derive(Debug, Clone, PartialEq)]
pub enum JournalEntry {
    /// A window was created.
    WindowCreated(WindowSpec),
    /// A font was opened.
    FontOpened(FontSpec),
    /// Text input was switched on.
    TextInputEnabled,
    /// Text input was switched off.
    TextInputDisabled,
    /// A draw call.
    Draw(DrawOp),
    /// The font was dropped.
    FontClosed,
    /// The window was dropped.
    WindowClosed,
}

/// Shared, append-only record of platform activity.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Rc<RefCell<Vec<JournalEntry>>>,
}

impl Journal {
    fn push(&self, entry: JournalEntry) {
        self.entries.borrow_mut().push(entry);
    }

    /// Snapshot of all entries in order.
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.borrow().clone()
    }

    /// Returns true if `entry` was recorded.
    pub fn contains(&self, entry: &JournalEntry) -> bool {
        self.entries.borrow().iter().any(|e| e == entry)
    }

    /// Position of the first entry equal to `entry`.
    pub fn position(&self, entry: &JournalEntry) -> Option<usize> {
        self.entries.borrow().iter().position(|e| e == entry)
    }

    /// Draw calls grouped per presented frame.
    pub fn frames(&self) -> Vec<Vec<DrawOp>> {
        let mut frames = Vec::new();
        let mut current = Vec::new();
        for entry in self.entries.borrow().iter() {
            if let JournalEntry::Draw(op) = entry {
                current.push(op.clone());
                if *op == DrawOp::Present {
                    frames.push(std::mem::take(&mut current));
                }
            }
        }
        frames
    }
}

/// Which operations should fail.
#[derive(Debug, Clone, Default)]
pub struct FailurePlan {
    /// `create_window` fails.
    pub window: bool,
    /// `open_font` fails.
    pub font: bool,
    /// `enable_text_input` fails.
    pub text_input: bool,
    /// `present` fails.
    pub present: bool,
    /// Rasterizing exactly this text fails.
    pub rasterize: Option<String>,
    /// How many times the `rasterize` text fails before it succeeds.
    /// `None` fails every time.
    pub rasterize_failures: Option<usize>,
}

/// Platform that needs no display.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    script: VecDeque<InputEvent>,
    journal: Journal,
    failures: FailurePlan,
    clock: Option<ManualClock>,
}

impl HeadlessPlatform {
    /// Creates a platform that will deliver `events` in order.
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            script: events.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Makes the listed operations fail.
    pub fn with_failures(mut self, failures: FailurePlan) -> Self {
        self.failures = failures;
        self
    }

    /// Advances `clock` by the full timeout on every poll, as if each event
    /// arrived exactly at the frame deadline.
    pub fn with_clock(mut self, clock: ManualClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Handle to the shared journal.
    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }
}

impl Platform for HeadlessPlatform {
    type Image = HeadlessImage;
    type Font = HeadlessFont;
    type Window = HeadlessWindow;

    fn create_window(&mut self, spec: &WindowSpec) -> Result<HeadlessWindow> {
        if self.failures.window {
            return Err(Error::Window("headless window disabled".to_string()));
        }
        self.journal.push(JournalEntry::WindowCreated(spec.clone()));
        Ok(HeadlessWindow {
            events: std::mem::take(&mut self.script),
            journal: self.journal.clone(),
            clock: self.clock.clone(),
            fail_text_input: self.failures.text_input,
            fail_present: self.failures.present,
            text_input: false,
        })
    }

    fn open_font(&mut self, spec: &FontSpec) -> Result<HeadlessFont> {
        if self.failures.font || spec.pixel_size == 0 {
            return Err(Error::Font {
                path: spec.path.clone(),
                reason: "headless font disabled".to_string(),
            });
        }
        self.journal.push(JournalEntry::FontOpened(spec.clone()));
        Ok(HeadlessFont {
            pixel_size: spec.pixel_size,
            journal: self.journal.clone(),
            fail_on: self.failures.rasterize.clone(),
            failures_left: Cell::new(self.failures.rasterize_failures),
        })
    }
}

/// Rasterized text that only remembers what it would show.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessImage {
    text: String,
    color: Color,
    size: Size,
}

impl RasterImage for HeadlessImage {
    fn size(&self) -> Size {
        self.size
    }
}

/// Monospaced font: every char advances by half the pixel size.
#[derive(Debug)]
pub struct HeadlessFont {
    pixel_size: u32,
    journal: Journal,
    fail_on: Option<String>,
    failures_left: Cell<Option<usize>>,
}

impl Font for HeadlessFont {
    type Image = HeadlessImage;

    fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    fn rasterize(&self, text: &str, color: Color) -> Result<HeadlessImage> {
        if self.fail_on.as_deref() == Some(text) {
            match self.failures_left.get() {
                None => {
                    return Err(Error::Rasterize(format!("scripted failure for {text:?}")));
                }
                Some(0) => {}
                Some(left) => {
                    self.failures_left.set(Some(left - 1));
                    return Err(Error::Rasterize(format!("scripted failure for {text:?}")));
                }
            }
        }
        Ok(HeadlessImage {
            text: text.to_string(),
            color,
            size: self.measure(text)?,
        })
    }

    fn measure(&self, text: &str) -> Result<Size> {
        let advance = self.pixel_size as f32 / 2.0;
        Ok(Size::new(
            text.chars().count() as f32 * advance,
            self.pixel_size as f32,
        ))
    }
}

impl Drop for HeadlessFont {
    fn drop(&mut self) {
        self.journal.push(JournalEntry::FontClosed);
    }
}

/// Window that replays scripted events and journals draw calls.
#[derive(Debug)]
pub struct HeadlessWindow {
    events: VecDeque<InputEvent>,
    journal: Journal,
    clock: Option<ManualClock>,
    fail_text_input: bool,
    fail_present: bool,
    text_input: bool,
}

impl HeadlessWindow {
    /// Whether text input is currently on.
    pub fn text_input_enabled(&self) -> bool {
        self.text_input
    }
}

impl Canvas<HeadlessImage> for HeadlessWindow {
    fn clear(&mut self, color: Color) -> Result<()> {
        self.journal.push(JournalEntry::Draw(DrawOp::Clear(color)));
        Ok(())
    }

    fn draw_image(&mut self, image: &HeadlessImage, dest: Rect) -> Result<()> {
        self.journal.push(JournalEntry::Draw(DrawOp::Image {
            text: image.text.clone(),
            dest,
            color: image.color,
        }));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        self.journal
            .push(JournalEntry::Draw(DrawOp::FillRect { rect, color }));
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        if self.fail_present {
            return Err(Error::Io(std::io::Error::other("headless present failed")));
        }
        self.journal.push(JournalEntry::Draw(DrawOp::Present));
        Ok(())
    }
}

impl TextInput for HeadlessWindow {
    fn enable_text_input(&mut self) -> Result<()> {
        if self.fail_text_input {
            return Err(Error::TextInput("headless text input disabled".to_string()));
        }
        self.text_input = true;
        self.journal.push(JournalEntry::TextInputEnabled);
        Ok(())
    }

    fn disable_text_input(&mut self) -> Result<()> {
        self.text_input = false;
        self.journal.push(JournalEntry::TextInputDisabled);
        Ok(())
    }
}

impl EventSource for HeadlessWindow {
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<InputEvent>> {
        if let Some(clock) = &self.clock {
            clock.advance(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        }
        Ok(Some(self.events.pop_front().unwrap_or(InputEvent::Quit)))
    }
}

impl Drop for HeadlessWindow {
    fn drop(&mut self) {
        self.journal.push(JournalEntry::WindowClosed);
    }
}
