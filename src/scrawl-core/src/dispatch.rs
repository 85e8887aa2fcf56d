//! Mapping from input events to buffer edits.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::buffer::TextBuffer;
use crate::event::{InputEvent, Key};

/// How typed characters reach the buffer.
///
/// A dispatcher uses exactly one style; events of the other style are
/// ignored so the two never interleave on the same buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Committed text fragments ([`InputEvent::TextInput`]) are appended.
    #[default]
    TextCommit,
    /// Raw printable key presses ([`Key::Char`]) are appended one at a time.
    RawKeys,
}

/// What the caller should do after an event was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Keep running.
    Continue,
    /// The event asked the application to terminate.
    Quit,
}

/// Applies input events to a [`TextBuffer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InputDispatcher {
    mode: DispatchMode,
}

impl InputDispatcher {
    /// Creates a dispatcher for the given input style.
    pub fn new(mode: DispatchMode) -> Self {
        Self { mode }
    }

    /// Returns the input style.
    #[inline]
    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Applies one event to `buffer`.
    ///
    /// Capacity rejections are absorbed here; the buffer simply does not
    /// reflect the rejected input.
    pub fn dispatch(&self, event: &InputEvent, buffer: &mut TextBuffer) -> Dispatch {
        match event {
            InputEvent::Quit => return Dispatch::Quit,
            InputEvent::Key(Key::Enter) => {
                buffer.newline();
                debug!(cursor = %buffer.cursor(), "Enter pressed");
            }
            InputEvent::Key(Key::Backspace) => {
                buffer.backspace();
                trace!(cursor = %buffer.cursor(), "Backspace");
            }
            InputEvent::TextInput(fragment) if self.mode == DispatchMode::TextCommit => {
                self.append(buffer, |b| b.append_text(fragment));
            }
            InputEvent::Key(Key::Char(c))
                if self.mode == DispatchMode::RawKeys && !c.is_control() =>
            {
                self.append(buffer, |b| b.append_char(*c));
            }
            _ => {}
        }
        Dispatch::Continue
    }

    fn append<F>(&self, buffer: &mut TextBuffer, edit: F)
    where
        F: FnOnce(&mut TextBuffer) -> Result<(), crate::error::CapacityError>,
    {
        match edit(buffer) {
            Ok(()) => {
                let line = buffer.cursor().line;
                trace!(line, text = %buffer.line_text(line), "Line updated");
            }
            Err(err) => debug!(%err, "Input rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{BufferLimits, Cursor, DEFAULT_PLACEHOLDER};
    use pretty_assertions::assert_eq;

    fn seeded() -> TextBuffer {
        TextBuffer::with_placeholder(BufferLimits::default(), DEFAULT_PLACEHOLDER)
    }

    fn feed(dispatcher: &InputDispatcher, buffer: &mut TextBuffer, events: &[InputEvent]) {
        for event in events {
            assert_eq!(dispatcher.dispatch(event, buffer), Dispatch::Continue);
        }
    }

    #[test]
    fn test_quit_does_not_touch_buffer() {
        let dispatcher = InputDispatcher::default();
        let mut buffer = seeded();
        assert_eq!(dispatcher.dispatch(&InputEvent::Quit, &mut buffer), Dispatch::Quit);
        assert_eq!(buffer.cursor(), Cursor::new(0, 16));
    }

    #[test]
    fn test_commit_typing_session() {
        let dispatcher = InputDispatcher::new(DispatchMode::TextCommit);
        let mut buffer = seeded();

        feed(&dispatcher, &mut buffer, &[Key::Enter.into()]);
        assert_eq!(buffer.cursor(), Cursor::new(1, 0));
        assert_eq!(buffer.line_text(0), "Text under here!");
        assert_eq!(buffer.line_text(1), "");

        feed(&dispatcher, &mut buffer, &[InputEvent::text("Hi")]);
        assert_eq!(buffer.line_text(1), "Hi");
        assert_eq!(buffer.cursor(), Cursor::new(1, 2));

        feed(&dispatcher, &mut buffer, &[Key::Backspace.into()]);
        assert_eq!(buffer.line_text(1), "H");
        assert_eq!(buffer.cursor(), Cursor::new(1, 1));

        feed(
            &dispatcher,
            &mut buffer,
            &[Key::Backspace.into(), Key::Backspace.into()],
        );
        assert_eq!(buffer.line_text(1), "");
        assert_eq!(buffer.cursor(), Cursor::new(1, 0));

        feed(&dispatcher, &mut buffer, &[Key::Backspace.into()]);
        assert_eq!(buffer.cursor(), Cursor::new(1, 0));
        assert_eq!(buffer.line_text(0), "Text under here!");
    }

    #[test]
    fn test_multi_char_fragment_is_one_edit() {
        let dispatcher = InputDispatcher::default();
        let mut buffer = TextBuffer::default();
        feed(&dispatcher, &mut buffer, &[InputEvent::text("こんにちは")]);
        assert_eq!(buffer.cursor(), Cursor::new(0, 5));
    }

    #[test]
    fn test_rejected_fragment_leaves_line_alone() {
        let limits = BufferLimits::new(4, 8).unwrap();
        let dispatcher = InputDispatcher::default();
        let mut buffer = TextBuffer::new(limits);
        feed(&dispatcher, &mut buffer, &[InputEvent::text("abcdef")]);
        assert_eq!(buffer.active_line().len(), limits.line_capacity() - 2);

        feed(&dispatcher, &mut buffer, &[InputEvent::text("xyz")]);
        assert_eq!(buffer.line_text(0), "abcdef");
        assert_eq!(buffer.cursor(), Cursor::new(0, 6));
    }

    #[test]
    fn test_text_commit_ignores_raw_keys() {
        let dispatcher = InputDispatcher::new(DispatchMode::TextCommit);
        let mut buffer = TextBuffer::default();
        feed(&dispatcher, &mut buffer, &[Key::Char('a').into(), Key::Other.into()]);
        assert_eq!(buffer.line_text(0), "");
        assert_eq!(buffer.cursor(), Cursor::new(0, 0));
    }

    #[test]
    fn test_raw_keys_mode() {
        let dispatcher = InputDispatcher::new(DispatchMode::RawKeys);
        let mut buffer = TextBuffer::default();
        feed(
            &dispatcher,
            &mut buffer,
            &[
                Key::Char('o').into(),
                Key::Char('k').into(),
                InputEvent::text("ignored"),
                Key::Char('\u{7}').into(),
                Key::Enter.into(),
                Key::Char('!').into(),
            ],
        );
        assert_eq!(buffer.line_text(0), "ok");
        assert_eq!(buffer.line_text(1), "!");
        assert_eq!(buffer.cursor(), Cursor::new(1, 1));
    }

    #[test]
    fn test_resize_is_not_an_edit() {
        let dispatcher = InputDispatcher::default();
        let mut buffer = seeded();
        feed(
            &dispatcher,
            &mut buffer,
            &[InputEvent::Resize {
                width: 100,
                height: 40,
            }],
        );
        assert_eq!(buffer.cursor(), Cursor::new(0, 16));
    }
}
