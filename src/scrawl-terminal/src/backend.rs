//! Terminal backend abstraction and crossterm implementation.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute, queue,
    style::{Color as CrosstermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode,
        enable_raw_mode, size,
    },
};
use scrawl_core::{Color, Error, Result};

/// Trait for terminal backend implementations.
///
/// [`TerminalWindow`](crate::TerminalWindow) only talks to the terminal
/// through this trait, so tests can substitute a recording backend.
pub trait TerminalBackend {
    /// Enters raw mode for the terminal.
    fn enter_raw_mode(&mut self) -> Result<()>;

    /// Exits raw mode, restoring normal terminal behavior.
    fn exit_raw_mode(&mut self) -> Result<()>;

    /// Enters the alternate screen buffer.
    fn enter_alternate_screen(&mut self) -> Result<()>;

    /// Leaves the alternate screen buffer.
    fn leave_alternate_screen(&mut self) -> Result<()>;

    /// Hides the terminal cursor.
    fn hide_cursor(&mut self) -> Result<()>;

    /// Shows the terminal cursor.
    fn show_cursor(&mut self) -> Result<()>;

    /// Sets the terminal window title.
    fn set_title(&mut self, title: &str) -> Result<()>;

    /// Moves the cursor to the specified position (0-based).
    fn move_cursor(&mut self, x: u16, y: u16) -> Result<()>;

    /// Gets the current terminal size (columns, rows).
    fn size(&self) -> Result<(u16, u16)>;

    /// Clears the entire screen.
    fn clear(&mut self) -> Result<()>;

    /// Flushes any buffered output to the terminal.
    fn flush(&mut self) -> Result<()>;

    /// Sets the foreground color.
    fn set_foreground(&mut self, color: Color) -> Result<()>;

    /// Sets the background color.
    fn set_background(&mut self, color: Color) -> Result<()>;

    /// Resets all colors to default.
    fn reset_style(&mut self) -> Result<()>;

    /// Writes a string at the current cursor position.
    fn write_str(&mut self, s: &str) -> Result<()>;

    /// Enables bracketed paste mode.
    fn enable_bracketed_paste(&mut self) -> Result<()>;

    /// Disables bracketed paste mode.
    fn disable_bracketed_paste(&mut self) -> Result<()>;

    /// Waits up to `timeout` for the next terminal event.
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Crossterm-based terminal backend writing to stdout.
pub struct CrosstermBackend {
    stdout: Stdout,
    in_raw_mode: bool,
    in_alternate_screen: bool,
    cursor_hidden: bool,
    bracketed_paste: bool,
}

impl CrosstermBackend {
    /// Creates a new crossterm backend. Nothing is sent to the terminal yet.
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            in_raw_mode: false,
            in_alternate_screen: false,
            cursor_hidden: false,
            bracketed_paste: false,
        }
    }

    /// Converts a Color to crossterm's Color type.
    #[inline]
    fn to_crossterm_color(color: Color) -> CrosstermColor {
        if color.is_transparent() {
            CrosstermColor::Reset
        } else {
            CrosstermColor::Rgb {
                r: color.r,
                g: color.g,
                b: color.b,
            }
        }
    }
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter_raw_mode(&mut self) -> Result<()> {
        if !self.in_raw_mode {
            enable_raw_mode().map_err(Error::Io)?;
            self.in_raw_mode = true;
        }
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        if self.in_raw_mode {
            disable_raw_mode().map_err(Error::Io)?;
            self.in_raw_mode = false;
        }
        Ok(())
    }

    fn enter_alternate_screen(&mut self) -> Result<()> {
        if !self.in_alternate_screen {
            execute!(self.stdout, EnterAlternateScreen).map_err(Error::Io)?;
            self.in_alternate_screen = true;
        }
        Ok(())
    }

    fn leave_alternate_screen(&mut self) -> Result<()> {
        if self.in_alternate_screen {
            execute!(self.stdout, LeaveAlternateScreen).map_err(Error::Io)?;
            self.in_alternate_screen = false;
        }
        Ok(())
    }

    fn hide_cursor(&mut self) -> Result<()> {
        if !self.cursor_hidden {
            execute!(self.stdout, Hide).map_err(Error::Io)?;
            self.cursor_hidden = true;
        }
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<()> {
        if self.cursor_hidden {
            execute!(self.stdout, Show).map_err(Error::Io)?;
            self.cursor_hidden = false;
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(self.stdout, SetTitle(title)).map_err(Error::Io)
    }

    fn move_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        queue!(self.stdout, MoveTo(x, y)).map_err(Error::Io)
    }

    fn size(&self) -> Result<(u16, u16)> {
        size().map_err(Error::Io)
    }

    fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, Clear(ClearType::All)).map_err(Error::Io)
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.flush().map_err(Error::Io)
    }

    fn set_foreground(&mut self, color: Color) -> Result<()> {
        queue!(
            self.stdout,
            SetForegroundColor(Self::to_crossterm_color(color))
        )
        .map_err(Error::Io)
    }

    fn set_background(&mut self, color: Color) -> Result<()> {
        queue!(
            self.stdout,
            SetBackgroundColor(Self::to_crossterm_color(color))
        )
        .map_err(Error::Io)
    }

    fn reset_style(&mut self) -> Result<()> {
        queue!(self.stdout, ResetColor).map_err(Error::Io)
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        queue!(self.stdout, Print(s)).map_err(Error::Io)
    }

    fn enable_bracketed_paste(&mut self) -> Result<()> {
        if !self.bracketed_paste {
            execute!(self.stdout, EnableBracketedPaste).map_err(Error::Io)?;
            self.bracketed_paste = true;
        }
        Ok(())
    }

    fn disable_bracketed_paste(&mut self) -> Result<()> {
        if self.bracketed_paste {
            execute!(self.stdout, DisableBracketedPaste).map_err(Error::Io)?;
            self.bracketed_paste = false;
        }
        Ok(())
    }

    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).map_err(Error::Io)? {
            event::read().map(Some).map_err(Error::Io)
        } else {
            Ok(None)
        }
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        // Best-effort cleanup on drop
        let _ = self.reset_style();
        let _ = self.disable_bracketed_paste();
        let _ = self.show_cursor();
        let _ = self.leave_alternate_screen();
        let _ = self.exit_raw_mode();
        let _ = self.flush();
    }
}

/// Puts the terminal back into cooked mode on the main screen.
///
/// Meant for panic hooks, where the window's own teardown may never run.
pub fn restore_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        ResetColor,
        DisableBracketedPaste,
        Show,
        LeaveAlternateScreen
    );
    let _ = disable_raw_mode();
}
