//! Bounded line grid and cursor.
//!
//! A [`TextBuffer`] holds a fixed number of [`Line`]s, each of which holds a
//! fixed number of characters. Edits that would overflow a line are rejected
//! whole, and the cursor never leaves the grid. Lengths are counted in
//! `char`s.

use std::fmt;

use crate::error::{CapacityError, Error, Result};

/// Default number of lines in a buffer.
pub const DEFAULT_MAX_LINES: usize = 1024;

/// Default per-line capacity, including the reserved terminator slot.
pub const DEFAULT_LINE_CAPACITY: usize = 1024;

/// Largest accepted number of lines. Every line is allocated up front.
pub const MAX_LINES_LIMIT: usize = 1 << 16;

/// Largest accepted per-line capacity.
pub const LINE_CAPACITY_LIMIT: usize = 1 << 16;

/// Text seeded into the first line of a fresh editor.
pub const DEFAULT_PLACEHOLDER: &str = "Text under here!";

/// Capacity caps for a [`TextBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferLimits {
    max_lines: usize,
    line_capacity: usize,
}

impl BufferLimits {
    /// Creates limits of `max_lines` lines with `line_capacity` slots each.
    ///
    /// One slot of every line is reserved, so a line holds at most
    /// `line_capacity - 1` characters. Both values are capped at
    /// [`MAX_LINES_LIMIT`] and [`LINE_CAPACITY_LIMIT`].
    pub fn new(max_lines: usize, line_capacity: usize) -> Result<Self> {
        if !(1..=MAX_LINES_LIMIT).contains(&max_lines) {
            return Err(Error::Config(format!(
                "max_lines must be between 1 and {MAX_LINES_LIMIT}, got {max_lines}"
            )));
        }
        if !(2..=LINE_CAPACITY_LIMIT).contains(&line_capacity) {
            return Err(Error::Config(format!(
                "line_capacity must be between 2 and {LINE_CAPACITY_LIMIT}, got {line_capacity}"
            )));
        }
        Ok(Self {
            max_lines,
            line_capacity,
        })
    }

    /// Maximum number of lines (N).
    #[inline]
    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Slots per line (M).
    #[inline]
    pub fn line_capacity(&self) -> usize {
        self.line_capacity
    }

    /// Maximum number of characters a line may hold (M - 1).
    #[inline]
    pub fn max_line_len(&self) -> usize {
        self.line_capacity - 1
    }
}

impl Default for BufferLimits {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
            line_capacity: DEFAULT_LINE_CAPACITY,
        }
    }
}

/// One row of text with a hard character limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    text: String,
    len: usize,
    limit: usize,
}

impl Line {
    fn new(limit: usize) -> Self {
        Self {
            text: String::new(),
            len: 0,
            limit,
        }
    }

    /// Number of characters in the line.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the line holds no characters.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The line contents.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the first `count` characters of the line.
    pub fn prefix(&self, count: usize) -> &str {
        match self.text.char_indices().nth(count) {
            Some((byte, _)) => &self.text[..byte],
            None => &self.text,
        }
    }

    /// Appends `s` if the result fits, returning the number of characters added.
    ///
    /// `index` is only used to describe the rejection.
    fn try_push_str(&mut self, index: usize, s: &str) -> std::result::Result<usize, CapacityError> {
        let added = s.chars().count();
        let requested = self.len + added;
        if requested > self.limit {
            return Err(CapacityError::LineFull {
                line: index,
                requested,
                limit: self.limit,
            });
        }
        self.text.push_str(s);
        self.len = requested;
        Ok(added)
    }

    fn pop(&mut self) -> Option<char> {
        let c = self.text.pop()?;
        self.len -= 1;
        Some(c)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Position where the next edit applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cursor {
    /// Index of the active line.
    pub line: usize,
    /// Character offset into the active line.
    pub column: usize,
}

impl Cursor {
    /// Creates a cursor at the given position.
    #[inline]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.line, self.column)
    }
}

/// Fixed grid of lines plus the cursor that edits it.
///
/// # Examples
///
/// ```
/// use scrawl_core::{BufferLimits, Cursor, TextBuffer};
///
/// let mut buffer = TextBuffer::new(BufferLimits::default());
/// buffer.append_text("Hi").unwrap();
/// buffer.newline();
/// buffer.append_char('!').unwrap();
///
/// assert_eq!(buffer.line_text(0), "Hi");
/// assert_eq!(buffer.line_text(1), "!");
/// assert_eq!(buffer.cursor(), Cursor::new(1, 1));
/// ```
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<Line>,
    cursor: Cursor,
    limits: BufferLimits,
}

impl TextBuffer {
    /// Creates an empty buffer with every line pre-allocated and the cursor at (0, 0).
    pub fn new(limits: BufferLimits) -> Self {
        let lines = (0..limits.max_lines())
            .map(|_| Line::new(limits.max_line_len()))
            .collect();
        Self {
            lines,
            cursor: Cursor::default(),
            limits,
        }
    }

    /// Creates a buffer whose first line holds `placeholder`.
    ///
    /// The placeholder goes through [`append_text`](Self::append_text), so the
    /// cursor ends up after it. A placeholder that does not fit is dropped.
    pub fn with_placeholder(limits: BufferLimits, placeholder: &str) -> Self {
        let mut buffer = Self::new(limits);
        if let Err(err) = buffer.append_text(placeholder) {
            tracing::warn!(%err, "Placeholder does not fit, starting empty");
        }
        buffer
    }

    /// Returns the cursor.
    #[inline]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Returns the line at `index`, if it is inside the grid.
    #[inline]
    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Returns the text of line `index`, or `""` outside the grid.
    pub fn line_text(&self, index: usize) -> &str {
        self.line(index).map_or("", Line::as_str)
    }

    /// Returns the line under the cursor.
    #[inline]
    pub fn active_line(&self) -> &Line {
        &self.lines[self.cursor.line]
    }

    /// Iterates the lines from the top through the cursor line, with indices.
    ///
    /// Lines past the cursor are never written, so they are not visible.
    pub fn visible_lines(&self) -> impl Iterator<Item = (usize, &Line)> {
        self.lines[..=self.cursor.line].iter().enumerate()
    }

    /// Returns true once the cursor sits on the last line.
    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.cursor.line + 1 >= self.limits.max_lines()
    }

    /// Appends `text` to the active line.
    ///
    /// Fails without touching the buffer if the line would exceed its limit.
    pub fn append_text(&mut self, text: &str) -> std::result::Result<(), CapacityError> {
        let index = self.cursor.line;
        let added = self.lines[index].try_push_str(index, text)?;
        self.cursor.column += added;
        Ok(())
    }

    /// Appends a single character to the active line.
    pub fn append_char(&mut self, c: char) -> std::result::Result<(), CapacityError> {
        let mut buf = [0u8; 4];
        self.append_text(c.encode_utf8(&mut buf))
    }

    /// Moves the cursor to the start of the next line.
    ///
    /// Does nothing on the last line.
    pub fn newline(&mut self) {
        if self.is_saturated() {
            return;
        }
        self.cursor.line += 1;
        self.cursor.column = 0;
    }

    /// Removes the character before the cursor.
    ///
    /// Does nothing at column 0; lines are never merged.
    pub fn backspace(&mut self) {
        if self.cursor.column == 0 {
            return;
        }
        if self.lines[self.cursor.line].pop().is_some() {
            self.cursor.column -= 1;
        }
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new(BufferLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn small(max_lines: usize, line_capacity: usize) -> TextBuffer {
        TextBuffer::new(BufferLimits::new(max_lines, line_capacity).unwrap())
    }

    #[test]
    fn test_limits_validation() {
        assert!(BufferLimits::new(0, 10).is_err());
        assert!(BufferLimits::new(1, 1).is_err());
        assert!(BufferLimits::new(usize::MAX / 2, 10).is_err());
        assert!(BufferLimits::new(MAX_LINES_LIMIT + 1, 10).is_err());
        assert!(BufferLimits::new(10, LINE_CAPACITY_LIMIT + 1).is_err());
        assert!(BufferLimits::new(MAX_LINES_LIMIT, LINE_CAPACITY_LIMIT).is_ok());
        let limits = BufferLimits::new(1, 2).unwrap();
        assert_eq!(limits.max_line_len(), 1);
        assert_eq!(BufferLimits::default().max_lines(), 1024);
        assert_eq!(BufferLimits::default().max_line_len(), 1023);
    }

    #[test]
    fn test_new_buffer_is_empty() {
        let buffer = TextBuffer::default();
        assert_eq!(buffer.cursor(), Cursor::new(0, 0));
        assert!(buffer.line(1023).unwrap().is_empty());
        assert!(buffer.line(1024).is_none());
        assert_eq!(buffer.visible_lines().count(), 1);
    }

    #[test]
    fn test_placeholder_advances_cursor() {
        let buffer = TextBuffer::with_placeholder(BufferLimits::default(), DEFAULT_PLACEHOLDER);
        assert_eq!(buffer.line_text(0), "Text under here!");
        assert_eq!(buffer.cursor(), Cursor::new(0, 16));
    }

    #[test]
    fn test_placeholder_too_long_is_dropped() {
        let buffer = TextBuffer::with_placeholder(BufferLimits::new(4, 4).unwrap(), "toolong");
        assert_eq!(buffer.line_text(0), "");
        assert_eq!(buffer.cursor(), Cursor::new(0, 0));
    }

    #[test]
    fn test_column_tracks_appended_lengths() {
        let mut buffer = TextBuffer::default();
        let mut expected = 0;
        for piece in ["a", "bc", "", "def", "ghij"] {
            buffer.append_text(piece).unwrap();
            expected += piece.len();
            assert_eq!(buffer.cursor().column, expected);
        }
        buffer.append_char('k').unwrap();
        assert_eq!(buffer.cursor().column, expected + 1);
        assert_eq!(buffer.line_text(0), "abcdefghijk");
    }

    #[test]
    fn test_append_fills_exactly_to_limit() {
        let mut buffer = small(2, 6);
        buffer.append_text("abcde").unwrap();
        assert_eq!(buffer.active_line().len(), 5);
        assert_eq!(
            buffer.append_char('f'),
            Err(CapacityError::LineFull {
                line: 0,
                requested: 6,
                limit: 5,
            })
        );
    }

    #[test]
    fn test_rejected_append_is_atomic() {
        let mut buffer = small(2, 10);
        buffer.append_text("abcdefgh").unwrap();
        let before = buffer.clone();

        let err = buffer.append_text("xyz").unwrap_err();
        assert_eq!(
            err,
            CapacityError::LineFull {
                line: 0,
                requested: 11,
                limit: 9,
            }
        );
        assert_eq!(buffer.line_text(0), before.line_text(0));
        assert_eq!(buffer.cursor(), before.cursor());
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        let mut buffer = small(1, 4);
        buffer.append_text("héé").unwrap();
        assert_eq!(buffer.cursor().column, 3);
        assert!(buffer.append_char('x').is_err());
        buffer.backspace();
        assert_eq!(buffer.line_text(0), "hé");
        assert_eq!(buffer.cursor().column, 2);
    }

    #[test]
    fn test_newline_moves_to_next_line_start() {
        let mut buffer = TextBuffer::default();
        buffer.append_text("abc").unwrap();
        buffer.newline();
        assert_eq!(buffer.cursor(), Cursor::new(1, 0));
        assert_eq!(buffer.line_text(0), "abc");
        assert_eq!(buffer.visible_lines().count(), 2);
    }

    #[test]
    fn test_newline_saturates_on_last_line() {
        let mut buffer = small(3, 8);
        buffer.newline();
        buffer.newline();
        buffer.append_text("end").unwrap();
        assert!(buffer.is_saturated());

        buffer.newline();
        assert_eq!(buffer.cursor(), Cursor::new(2, 3));
        assert_eq!(buffer.line_text(2), "end");
    }

    #[test]
    fn test_backspace_at_column_zero_is_noop() {
        let mut buffer = TextBuffer::default();
        buffer.append_text("above").unwrap();
        buffer.newline();
        buffer.backspace();
        assert_eq!(buffer.cursor(), Cursor::new(1, 0));
        assert_eq!(buffer.line_text(0), "above");
    }

    #[test]
    fn test_prefix() {
        let mut buffer = TextBuffer::default();
        buffer.append_text("añb").unwrap();
        let line = buffer.active_line();
        assert_eq!(line.prefix(0), "");
        assert_eq!(line.prefix(2), "añ");
        assert_eq!(line.prefix(10), "añb");
    }
}
