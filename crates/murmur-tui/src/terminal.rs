//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering.

use std::io::{self, Stdout, stdout};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use murmur_app::{App, AppEvent, ConfigError, ContactId, Driver, Route};
use murmur_core::{Environment, StorageError};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;

use crate::{
    input::{InputState, KeyInput},
    ui,
};

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The data directory could not be opened.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Rejected configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Owns the input state for text editing; key presses that only touch the
/// draft are echoed immediately, everything else goes through the app.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    input_state: InputState,
}

impl TerminalDriver {
    /// Enter raw mode and the alternate screen.
    pub fn new() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();

        Ok(Self { terminal, event_stream, input_state: InputState::new() })
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Tab => Some(KeyInput::Tab),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }

    fn draw<E: Environment>(&mut self, app: &App<E>) -> Result<(), TerminalError> {
        let input = &self.input_state;
        self.terminal.draw(|frame| ui::render(frame, app, input))?;
        Ok(())
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event<E: Environment>(
        &mut self,
        app: &App<E>,
    ) -> Result<Vec<AppEvent>, Self::Error> {
        let timeout = tokio::time::Duration::from_millis(100);

        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                        // Raw mode swallows SIGINT.
                        if key_event.modifiers.contains(KeyModifiers::CONTROL)
                            && key_event.code == KeyCode::Char('c')
                        {
                            return Ok(vec![AppEvent::Shutdown]);
                        }
                        let Some(key_input) = Self::convert_key(key_event.code) else {
                            return Ok(vec![]);
                        };
                        let events = self.input_state.handle_key(key_input, app);
                        // Local echo; the app redraws again if it changes.
                        self.draw(app)?;
                        Ok(events)
                    },
                    Some(Ok(Event::Resize(..))) => {
                        self.draw(app)?;
                        Ok(vec![])
                    },
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    None => Ok(vec![AppEvent::Shutdown]),
                    _ => Ok(vec![]),
                }
            }

            // Tick timeout
            () = tokio::time::sleep(timeout) => Ok(vec![]),
        }
    }

    fn render<E: Environment>(&mut self, app: &App<E>) -> Result<(), Self::Error> {
        self.draw(app)
    }

    fn typing_changed(&mut self, contact_id: ContactId, typing: bool) {
        tracing::debug!("local typing in conversation {contact_id}: {typing}");
    }

    fn redirected(&mut self, route: Route) {
        tracing::info!("now showing {route}");
    }

    fn stop(&mut self) {
        tracing::info!("terminal driver stopping");
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
