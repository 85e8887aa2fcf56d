//! Editor configuration.
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) yields the stock editor: an 800x600 resizable window, a 20px font,
//! 1024 lines of 1023 characters and the placeholder line.

use std::path::PathBuf;

use scrawl_core::{BufferLimits, DEFAULT_PLACEHOLDER, DispatchMode, Error, Result};
use serde::{Deserialize, Serialize};

use crate::platform::{FontSpec, WindowSpec};
use crate::render::RenderSettings;

/// Application metadata reported at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Human-readable application name; also the default window title.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Reverse-DNS identifier.
    pub identifier: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "text editor".to_string(),
            version: "1.0".to_string(),
            identifier: "com.example.texteditor".to_string(),
        }
    }
}

/// `[window]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Title override; defaults to the application name.
    pub title: Option<String>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Whether the window can be resized.
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: None,
            width: 800,
            height: 600,
            resizable: true,
        }
    }
}

/// `[font]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Font file; the platform's built-in face when unset.
    pub path: Option<PathBuf>,
    /// Pixel size.
    pub size: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            size: 20,
        }
    }
}

/// `[buffer]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Number of lines.
    pub max_lines: usize,
    /// Slots per line, including the reserved one.
    pub line_capacity: usize,
    /// Text seeded into the first line. Empty disables seeding.
    pub placeholder: String,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            max_lines: scrawl_core::DEFAULT_MAX_LINES,
            line_capacity: scrawl_core::DEFAULT_LINE_CAPACITY,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

/// `[input]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// How typed characters reach the buffer.
    pub mode: DispatchMode,
}

/// Complete editor configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// `[app]` section.
    pub app: AppMetadata,
    /// `[window]` section.
    pub window: WindowConfig,
    /// `[font]` section.
    pub font: FontConfig,
    /// `[buffer]` section.
    pub buffer: BufferConfig,
    /// `[input]` section.
    pub input: InputConfig,
    /// `[render]` section.
    pub render: RenderSettings,
}

impl EditorConfig {
    /// Checks values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        self.buffer_limits()?;
        if self.font.size == 0 {
            return Err(Error::Config("font.size must be positive".to_string()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(Error::Config(format!(
                "window size must be positive, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if self.render.fps == 0 {
            return Err(Error::Config("render.fps must be positive".to_string()));
        }
        Ok(())
    }

    /// Window parameters.
    pub fn window_spec(&self) -> WindowSpec {
        WindowSpec {
            title: self
                .window
                .title
                .clone()
                .unwrap_or_else(|| self.app.name.clone()),
            width: self.window.width,
            height: self.window.height,
            resizable: self.window.resizable,
        }
    }

    /// Font parameters.
    pub fn font_spec(&self) -> FontSpec {
        FontSpec {
            path: self.font.path.clone(),
            pixel_size: self.font.size,
        }
    }

    /// Buffer capacity caps.
    pub fn buffer_limits(&self) -> Result<BufferLimits> {
        BufferLimits::new(self.buffer.max_lines, self.buffer.line_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::CursorPlacement;
    use pretty_assertions::assert_eq;
    use scrawl_core::Color;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.window_spec(),
            WindowSpec {
                title: "text editor".to_string(),
                width: 800,
                height: 600,
                resizable: true,
            }
        );
        assert_eq!(config.font_spec().pixel_size, 20);
        assert_eq!(config.buffer.placeholder, "Text under here!");
        assert_eq!(config.input.mode, DispatchMode::TextCommit);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: EditorConfig = toml::from_str(
            r##"
            [window]
            title = "notes"

            [input]
            mode = "raw_keys"

            [render]
            background = "#000"
            cursor_placement = "legacy"
            "##,
        )
        .unwrap();

        assert_eq!(config.window_spec().title, "notes");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.input.mode, DispatchMode::RawKeys);
        assert_eq!(config.render.background, Color::BLACK);
        assert_eq!(config.render.foreground, Color::WHITE);
        assert_eq!(config.render.cursor_placement, CursorPlacement::Legacy);
        assert_eq!(config.render.origin_x, 10.0);
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let result: std::result::Result<EditorConfig, _> =
            toml::from_str("[render]\nforeground = \"#12345\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EditorConfig::default();
        config.buffer.line_capacity = 1;
        assert!(config.validate().is_err());

        let mut config = EditorConfig::default();
        config.font.size = 0;
        assert!(config.validate().is_err());

        let mut config = EditorConfig::default();
        config.window.height = 0;
        assert!(config.validate().is_err());

        let mut config = EditorConfig::default();
        config.render.fps = 0;
        assert!(config.validate().is_err());
    }
}
