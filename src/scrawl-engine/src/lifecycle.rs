//! Application lifecycle.
//!
//! ```text
//! Uninitialized ──initialize──▶ Initializing ──ok──▶ Running ──quit──▶ Quitting ──shutdown──▶ Terminated
//!                                    │                                                            ▲
//!                                    └────────────────────────failure─────────────────────────────┘
//! ```
//!
//! [`AppLifecycle`] owns the platform, the clock and, while running, an
//! [`AppContext`] holding the window, the font, the buffer, the dispatcher and
//! the renderer. Each [`step`](AppLifecycle::step) waits for at most one event
//! until the next frame deadline, dispatches it, then renders if the deadline
//! has passed.

use std::fmt;
use std::time::Duration;

use scrawl_core::{Dispatch, DispatchMode, Error, InputDispatcher, InputEvent, TextBuffer};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::config::EditorConfig;
use crate::platform::{EventSource, Platform, TextInput};
use crate::render::Renderer;

/// Lifecycle states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Nothing acquired yet.
    Uninitialized,
    /// Acquiring window, font and text input.
    Initializing,
    /// Processing events and drawing frames.
    Running,
    /// Releasing resources.
    Quitting,
    /// Finished; the outcome is final.
    Terminated,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Initializing => "initializing",
            LifecycleState::Running => "running",
            LifecycleState::Quitting => "quitting",
            LifecycleState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Why the application stopped unsuccessfully.
#[derive(Error, Debug)]
pub enum Failure {
    /// Window, font or text input could not be acquired.
    #[error("initialization failed: {0}")]
    Init(#[source] Error),

    /// The platform failed while running.
    #[error("platform failure: {0}")]
    Runtime(#[source] Error),
}

/// Final result of a run.
#[derive(Debug)]
pub enum Outcome {
    /// The user quit.
    Success,
    /// Something failed.
    Failure(Failure),
}

impl Outcome {
    /// Returns true for [`Outcome::Success`].
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::Failure(_) => 1,
        }
    }
}

/// Everything the running editor owns.
pub struct AppContext<P: Platform> {
    window: P::Window,
    font: P::Font,
    buffer: TextBuffer,
    dispatcher: InputDispatcher,
    renderer: Renderer,
    text_input_enabled: bool,
    next_frame_at: u64,
}

impl<P: Platform> AppContext<P> {
    /// The text buffer.
    #[inline]
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Whether text-input mode is on.
    #[inline]
    pub fn text_input_enabled(&self) -> bool {
        self.text_input_enabled
    }
}

/// State machine driving initialization, the frame loop and teardown.
pub struct AppLifecycle<P: Platform, C: Clock> {
    platform: P,
    clock: C,
    config: EditorConfig,
    state: LifecycleState,
    context: Option<AppContext<P>>,
    outcome: Option<Outcome>,
}

impl<P: Platform, C: Clock> AppLifecycle<P, C> {
    /// Creates an uninitialized lifecycle.
    pub fn new(platform: P, clock: C, config: EditorConfig) -> Self {
        Self {
            platform,
            clock,
            config,
            state: LifecycleState::Uninitialized,
            context: None,
            outcome: None,
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The outcome, once one has been decided.
    #[inline]
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// The running context, if any.
    #[inline]
    pub fn context(&self) -> Option<&AppContext<P>> {
        self.context.as_ref()
    }

    /// The text buffer while the context exists.
    pub fn buffer(&self) -> Option<&TextBuffer> {
        self.context.as_ref().map(AppContext::buffer)
    }

    /// Acquires all resources and enters `Running`.
    ///
    /// On failure, anything already acquired is released and the lifecycle
    /// terminates with [`Failure::Init`]. Returns true if running.
    pub fn initialize(&mut self) -> bool {
        if self.state != LifecycleState::Uninitialized {
            return self.state == LifecycleState::Running;
        }

        self.state = LifecycleState::Initializing;
        let app = &self.config.app;
        info!(
            name = %app.name,
            version = %app.version,
            identifier = %app.identifier,
            "Starting"
        );

        match self.acquire() {
            Ok(context) => {
                self.context = Some(context);
                self.state = LifecycleState::Running;
                debug!("Running");
                true
            }
            Err(err) => {
                error!(%err, "Initialization failed");
                self.outcome = Some(Outcome::Failure(Failure::Init(err)));
                self.state = LifecycleState::Terminated;
                false
            }
        }
    }

    fn acquire(&mut self) -> Result<AppContext<P>, Error> {
        self.config.validate()?;
        let limits = self.config.buffer_limits()?;

        let mut window = self.platform.create_window(&self.config.window_spec())?;
        let font = self.platform.open_font(&self.config.font_spec())?;

        // Raw key presses only arrive while text input is off.
        let mode = self.config.input.mode;
        let text_input_enabled = mode == DispatchMode::TextCommit;
        if text_input_enabled {
            window.enable_text_input()?;
        }

        let placeholder = self.config.buffer.placeholder.as_str();
        let buffer = if placeholder.is_empty() {
            TextBuffer::new(limits)
        } else {
            TextBuffer::with_placeholder(limits, placeholder)
        };

        Ok(AppContext {
            window,
            font,
            buffer,
            dispatcher: InputDispatcher::new(mode),
            renderer: Renderer::new(self.config.render.clone()),
            text_input_enabled,
            next_frame_at: self.clock.now_millis(),
        })
    }

    /// Runs one loop iteration. Does nothing unless `Running`.
    pub fn step(&mut self) {
        if self.state != LifecycleState::Running {
            return;
        }
        let Some(context) = self.context.as_mut() else {
            return;
        };

        if let Some(outcome) = Self::iterate(context, &self.clock) {
            self.begin_quit(outcome);
        }
    }

    /// Polls, dispatches and renders; returns an outcome when the loop must stop.
    fn iterate(context: &mut AppContext<P>, clock: &C) -> Option<Outcome> {
        let now = clock.now_millis();
        let timeout = Duration::from_millis(context.next_frame_at.saturating_sub(now));

        match context.window.poll_event(timeout) {
            Ok(Some(InputEvent::Resize { width, height })) => {
                debug!(width, height, "Window resized");
            }
            Ok(Some(event)) => {
                if context.dispatcher.dispatch(&event, &mut context.buffer) == Dispatch::Quit {
                    info!("Quit requested");
                    return Some(Outcome::Success);
                }
            }
            Ok(None) => {}
            Err(err) => {
                error!(%err, "Couldn't poll events");
                return Some(Outcome::Failure(Failure::Runtime(err)));
            }
        }

        let now = clock.now_millis();
        if now >= context.next_frame_at {
            if let Err(err) =
                context
                    .renderer
                    .render(&mut context.window, &context.font, &context.buffer, now)
            {
                error!(%err, "Couldn't present frame");
                return Some(Outcome::Failure(Failure::Runtime(err)));
            }
            context.next_frame_at = now + context.renderer.settings().frame_interval_ms();
        }

        None
    }

    /// Asks a running application to quit successfully.
    pub fn request_quit(&mut self) {
        if self.state == LifecycleState::Running {
            self.begin_quit(Outcome::Success);
        }
    }

    fn begin_quit(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.state = LifecycleState::Quitting;
    }

    /// Releases resources and enters `Terminated`. Does nothing unless `Quitting`.
    pub fn shutdown(&mut self) {
        if self.state != LifecycleState::Quitting {
            return;
        }

        if let Some(context) = self.context.take() {
            let AppContext {
                mut window,
                font,
                text_input_enabled,
                ..
            } = context;

            if text_input_enabled && let Err(err) = window.disable_text_input() {
                warn!(%err, "Couldn't stop text input");
            }
            drop(font);
            debug!("Font released");
            drop(window);
        }

        self.state = LifecycleState::Terminated;
        debug!("Terminated");
    }

    /// Drives the lifecycle to completion and returns the outcome.
    pub fn run(mut self) -> Outcome {
        if self.initialize() {
            while self.state == LifecycleState::Running {
                self.step();
            }
            self.shutdown();
        }
        self.outcome.take().unwrap_or(Outcome::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Outcome::Success.exit_code(), 0);
        let failure = Outcome::Failure(Failure::Init(Error::Window("no display".into())));
        assert_eq!(failure.exit_code(), 1);
        assert!(!failure.is_success());
    }

    #[test]
    fn test_failure_display() {
        let failure = Failure::Init(Error::Window("no display".into()));
        assert_eq!(
            failure.to_string(),
            "initialization failed: Couldn't create window/renderer: no display"
        );
    }

    #[test]
    fn test_state_display() {
        assert_eq!(LifecycleState::Quitting.to_string(), "quitting");
    }
}
