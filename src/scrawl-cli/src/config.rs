//! Configuration file discovery and loading.
//!
//! Lookup order:
//! 1. `--config <FILE>`
//! 2. `SCRAWL_CONFIG` environment variable
//! 3. `<config dir>/scrawl/config.toml`
//!
//! The first two must exist. The default location may be absent, in which
//! case built-in defaults apply. Command-line flags are applied on top.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use scrawl_core::DispatchMode;
use scrawl_engine::EditorConfig;
use tracing::debug;

use crate::args::Cli;

/// Environment variable naming the config file.
pub const SCRAWL_CONFIG_ENV: &str = "SCRAWL_CONFIG";

/// Per-user application directory name.
pub const APP_DIR: &str = "scrawl";

/// Config file name inside [`APP_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Where the configuration is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    /// File path.
    pub path: PathBuf,
    /// Whether a missing file is an error.
    pub required: bool,
}

/// Resolves the config location from the flag, the environment and the
/// platform config directory.
pub fn locate(flag: Option<&Path>) -> Option<ConfigLocation> {
    locate_with(
        flag,
        std::env::var(SCRAWL_CONFIG_ENV).ok(),
        dirs::config_dir(),
    )
}

fn locate_with(
    flag: Option<&Path>,
    env_value: Option<String>,
    config_dir: Option<PathBuf>,
) -> Option<ConfigLocation> {
    if let Some(path) = flag {
        return Some(ConfigLocation {
            path: path.to_path_buf(),
            required: true,
        });
    }

    if let Some(val) = env_value
        && !val.is_empty()
    {
        let path = PathBuf::from(val);
        debug!(path = %path.display(), "Using SCRAWL_CONFIG");
        return Some(ConfigLocation {
            path,
            required: true,
        });
    }

    config_dir.map(|dir| ConfigLocation {
        path: dir.join(APP_DIR).join(CONFIG_FILE),
        required: false,
    })
}

/// Reads the configuration at `location`.
pub fn load_from(location: &ConfigLocation) -> Result<EditorConfig> {
    let path = &location.path;
    if !path.exists() {
        if location.required {
            bail!("Config file not found: {}", path.display());
        }
        debug!(path = %path.display(), "Config file not found, using defaults");
        return Ok(EditorConfig::default());
    }

    debug!(path = %path.display(), "Loading config file");
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parses TOML configuration text.
pub fn parse(content: &str) -> Result<EditorConfig> {
    Ok(toml::from_str(content)?)
}

/// Applies command-line overrides on top of a loaded configuration.
pub fn apply_overrides(config: &mut EditorConfig, cli: &Cli) {
    if let Some(font) = &cli.font {
        config.font.path = Some(font.clone());
    }
    if let Some(size) = cli.font_size {
        config.font.size = size;
    }
    if cli.raw_keys {
        config.input.mode = DispatchMode::RawKeys;
    }
    if let Some(fps) = cli.fps {
        config.render.fps = fps;
    }
}

/// Locates, loads, overrides and validates the configuration.
pub fn load(cli: &Cli) -> Result<EditorConfig> {
    let mut config = match locate(cli.config.as_deref()) {
        Some(location) => load_from(&location)?,
        None => {
            debug!("No config directory, using defaults");
            EditorConfig::default()
        }
    };
    apply_overrides(&mut config, cli);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
