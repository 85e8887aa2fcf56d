//! Conversion from crossterm events to editor events.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use scrawl_core::{InputEvent, Key};

/// Translates one terminal event.
///
/// While `text_input` is on, printable keys and pastes arrive as
/// [`InputEvent::TextInput`]; otherwise printable keys arrive as
/// [`Key::Char`] and pastes are dropped. A paste spanning several lines
/// becomes one fragment per line with [`Key::Enter`] in between.
pub fn translate(event: Event, text_input: bool) -> Vec<InputEvent> {
    match event {
        Event::Key(key) => translate_key(key, text_input).into_iter().collect(),
        Event::Paste(text) if text_input => translate_paste(&text),
        Event::Resize(width, height) => vec![InputEvent::Resize {
            width: u32::from(width),
            height: u32::from(height),
        }],
        _ => Vec::new(),
    }
}

fn translate_key(key: KeyEvent, text_input: bool) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    let event = match key.code {
        KeyCode::Char(c) if ctrl && matches!(c.to_ascii_lowercase(), 'c' | 'q' | 'd') => {
            InputEvent::Quit
        }
        KeyCode::Enter => Key::Enter.into(),
        KeyCode::Backspace => Key::Backspace.into(),
        KeyCode::Char(c) if ctrl || alt || c.is_control() => Key::Other.into(),
        KeyCode::Char(c) if text_input => InputEvent::TextInput(c.to_string()),
        KeyCode::Char(c) => Key::Char(c).into(),
        _ => Key::Other.into(),
    };
    Some(event)
}

fn translate_paste(text: &str) -> Vec<InputEvent> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut events = Vec::new();

    for (index, line) in normalized.split('\n').enumerate() {
        if index > 0 {
            events.push(Key::Enter.into());
        }
        let fragment: String = line.chars().filter(|c| !c.is_control()).collect();
        if !fragment.is_empty() {
            events.push(InputEvent::TextInput(fragment));
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_quit_chords() {
        for c in ['c', 'q', 'd', 'C'] {
            assert_eq!(
                translate(press(KeyCode::Char(c), KeyModifiers::CONTROL), true),
                vec![InputEvent::Quit]
            );
        }
    }

    #[test]
    fn test_commit_and_delete_keys() {
        assert_eq!(
            translate(press(KeyCode::Enter, KeyModifiers::NONE), true),
            vec![InputEvent::Key(Key::Enter)]
        );
        assert_eq!(
            translate(press(KeyCode::Backspace, KeyModifiers::NONE), false),
            vec![InputEvent::Key(Key::Backspace)]
        );
    }

    #[test]
    fn test_printable_depends_on_text_input() {
        let event = press(KeyCode::Char('x'), KeyModifiers::SHIFT);
        assert_eq!(translate(event.clone(), true), vec![InputEvent::text("x")]);
        assert_eq!(translate(event, false), vec![InputEvent::Key(Key::Char('x'))]);
    }

    #[test]
    fn test_modified_chars_are_other_keys() {
        assert_eq!(
            translate(press(KeyCode::Char('x'), KeyModifiers::ALT), true),
            vec![InputEvent::Key(Key::Other)]
        );
        assert_eq!(
            translate(press(KeyCode::Char('s'), KeyModifiers::CONTROL), false),
            vec![InputEvent::Key(Key::Other)]
        );
        assert_eq!(
            translate(press(KeyCode::Left, KeyModifiers::NONE), true),
            vec![InputEvent::Key(Key::Other)]
        );
    }

    #[test]
    fn test_release_is_ignored() {
        let release = Event::Key(KeyEvent::new_with_kind(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        assert!(translate(release, true).is_empty());
    }

    #[test]
    fn test_multiline_paste() {
        assert_eq!(
            translate(Event::Paste("one\r\ntwo\n\tthree".to_string()), true),
            vec![
                InputEvent::text("one"),
                InputEvent::Key(Key::Enter),
                InputEvent::text("two"),
                InputEvent::Key(Key::Enter),
                InputEvent::text("three"),
            ]
        );
        assert_eq!(
            translate(Event::Paste("a\n".to_string()), true),
            vec![InputEvent::text("a"), InputEvent::Key(Key::Enter)]
        );
    }

    #[test]
    fn test_paste_without_text_input_is_dropped() {
        assert!(translate(Event::Paste("abc".to_string()), false).is_empty());
    }

    #[test]
    fn test_resize_and_focus() {
        assert_eq!(
            translate(Event::Resize(120, 40), true),
            vec![InputEvent::Resize {
                width: 120,
                height: 40,
            }]
        );
        assert!(translate(Event::FocusGained, true).is_empty());
    }
}
