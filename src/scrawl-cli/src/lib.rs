//! Scrawl command-line front end.
//!
//! Parses arguments, sets up file logging, loads the configuration and runs
//! the editor on the terminal platform.

use std::panic;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use scrawl_engine::{AppLifecycle, EditorConfig, MonotonicClock, Outcome};
use scrawl_terminal::{CellMetrics, TerminalPlatform};
use tracing::{error, info};

pub mod args;
pub mod config;
pub mod logging;

pub use args::{Cli, LogLevel};

static PANIC_HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Restores the terminal before the default panic message is printed.
pub fn install_panic_hook() {
    // Only install once
    if PANIC_HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        scrawl_terminal::restore_terminal();
        original_hook(panic_info);
    }));
}

/// Runs the editor with an already-loaded configuration.
pub fn run_editor(config: EditorConfig) -> Outcome {
    let metrics = CellMetrics::for_font(config.font.size, config.render.line_padding);
    let platform = TerminalPlatform::new(metrics);
    AppLifecycle::new(platform, MonotonicClock::new(), config).run()
}

/// Full program: logging, configuration, editor. Returns the exit code.
pub fn run(cli: Cli) -> Result<ExitCode> {
    let _log_guard = logging::init(&cli)?;
    let config = config::load(&cli)?;

    if cli.print_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    install_panic_hook();
    let outcome = run_editor(config);
    match &outcome {
        Outcome::Success => info!("Exited normally"),
        Outcome::Failure(failure) => {
            error!(%failure, "Exited with failure");
            eprintln!("scrawl: {failure}");
        }
    }
    Ok(ExitCode::from(outcome.exit_code()))
}
