//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. Timeline requests never pass
//! through here; the runtime runs them on their own tasks.

use std::{
    collections::VecDeque,
    io::{self, Stdout, stdout},
    time::Duration,
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tootline_app::{App, AppEvent, AppearanceTracker, Driver, KeyInput};
use tootline_client::ApiError;

use crate::ui;

/// Interval between `Tick` events while the terminal is idle.
const TICK: Duration = Duration::from_millis(100);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The terminal event stream ended.
    #[error("terminal input closed")]
    InputClosed,
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Owns the ratatui terminal and the crossterm event stream. After every
/// frame it checks whether a timeline just appeared and, if so, queues the
/// initial load ahead of terminal input.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    appearance: AppearanceTracker,
    pending: VecDeque<AppEvent>,
    restored: bool,
}

impl TerminalDriver {
    /// Enter raw mode and the alternate screen.
    pub fn new() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();

        Ok(Self {
            terminal,
            event_stream,
            appearance: AppearanceTracker::new(),
            pending: VecDeque::new(),
            restored: false,
        })
    }

    /// Convert a crossterm key press to an event. `Ctrl-C` quits.
    fn convert_key(key: KeyEvent) -> Option<AppEvent> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(AppEvent::Quit);
        }
        let input = match key.code {
            KeyCode::Char(c) => KeyInput::Char(c),
            KeyCode::Esc => KeyInput::Esc,
            KeyCode::Up => KeyInput::Up,
            KeyCode::Down => KeyInput::Down,
            KeyCode::Home => KeyInput::Home,
            KeyCode::End => KeyInput::End,
            _ => return None,
        };
        Some(AppEvent::Key(input))
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }

        tokio::select! {
            biased;

            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        Ok(Self::convert_key(key))
                    },
                    Some(Ok(Event::Resize(cols, rows))) => Ok(Some(AppEvent::Resize(cols, rows))),
                    Some(Ok(_)) => Ok(None),
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    None => Err(TerminalError::InputClosed),
                }
            }

            () = tokio::time::sleep(TICK) => Ok(Some(AppEvent::Tick)),
        }
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::render(frame, app))?;

        if app.is_restored() && !self.restored {
            self.restored = true;
            tracing::info!(screen = ?app.screen().kind(), "startup complete");
        }
        if let Some(event) = self.appearance.observe(app) {
            self.pending.push_back(event);
        }
        Ok(())
    }

    fn report_error(&mut self, error: &ApiError) {
        tracing::error!(%error, kind = ?error.kind(), "timeline request failed");
    }

    fn stop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn navigation_keys_map_to_input() {
        assert!(matches!(
            TerminalDriver::convert_key(press(KeyCode::Char('j'), KeyModifiers::NONE)),
            Some(AppEvent::Key(KeyInput::Char('j')))
        ));
        assert!(matches!(
            TerminalDriver::convert_key(press(KeyCode::End, KeyModifiers::NONE)),
            Some(AppEvent::Key(KeyInput::End))
        ));
        assert!(TerminalDriver::convert_key(press(KeyCode::Tab, KeyModifiers::NONE)).is_none());
    }

    #[test]
    fn ctrl_c_quits() {
        assert!(matches!(
            TerminalDriver::convert_key(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(AppEvent::Quit)
        ));
    }
}
