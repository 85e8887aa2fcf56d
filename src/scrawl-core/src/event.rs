//! Platform-neutral input events.
//!
//! Backends translate whatever their windowing or terminal library delivers
//! into these types before handing them to the dispatcher.

use std::fmt;

/// A key the editor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Commit key (Enter/Return).
    Enter,
    /// Delete-back key.
    Backspace,
    /// A printable character key, delivered raw.
    Char(char),
    /// Any other key; never mutates the buffer.
    Other,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Enter => f.write_str("enter"),
            Key::Backspace => f.write_str("backspace"),
            Key::Char(c) => write!(f, "{c:?}"),
            Key::Other => f.write_str("other"),
        }
    }
}

/// Represents any input event delivered to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The user or the system asked the application to quit.
    Quit,
    /// A key was pressed.
    Key(Key),
    /// A committed text fragment (typed, composed by an IME, or pasted).
    TextInput(String),
    /// The drawable area changed size (in the backend's native units).
    Resize {
        /// New width.
        width: u32,
        /// New height.
        height: u32,
    },
}

impl InputEvent {
    /// Creates a text-input event.
    pub fn text(fragment: impl Into<String>) -> Self {
        InputEvent::TextInput(fragment.into())
    }
}

impl From<Key> for InputEvent {
    fn from(key: Key) -> Self {
        InputEvent::Key(key)
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputEvent::Quit => f.write_str("Quit"),
            InputEvent::Key(key) => write!(f, "Key({key})"),
            InputEvent::TextInput(text) => {
                let preview: String = text.chars().take(20).collect();
                if preview.len() < text.len() {
                    write!(f, "TextInput({preview:?}...)")
                } else {
                    write!(f, "TextInput({preview:?})")
                }
            }
            InputEvent::Resize { width, height } => write!(f, "Resize({width}x{height})"),
        }
    }
}
