//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from the terminal.
//! The TUI implements it with crossterm and ratatui; the harness implements
//! it with scripted events, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use tootline_client::ApiError;

use crate::{App, AppEvent, EngineId, FetchPhase};

/// Abstracts user-facing I/O for the application runtime.
///
/// Network access is not part of the driver: page requests go through
/// [`tootline_client::TimelineApi`], owned by the runtime.
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Poll for the next input event.
    ///
    /// Must be cancel-safe: the runtime races it against session changes and
    /// fetch completions. Returns `None` when no event is ready.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Surface a failed page request.
    fn report_error(&mut self, error: &ApiError);

    /// Restore the terminal and release resources.
    fn stop(&mut self);
}

/// Requests the first page the first time each timeline is shown.
///
/// Drivers call [`AppearanceTracker::observe`] after every render and feed
/// the returned event back as input. A failed first load is not retried
/// automatically; the user retries explicitly.
#[derive(Debug, Default)]
pub struct AppearanceTracker {
    shown: Option<EngineId>,
}

impl AppearanceTracker {
    /// Create a tracker that has seen no timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rendered frame.
    ///
    /// Returns [`AppEvent::LoadTimeline`] when `app` shows a timeline engine
    /// for the first time and that engine has nothing loaded yet.
    pub fn observe(&mut self, app: &App) -> Option<AppEvent> {
        let engine = app.timeline()?;
        if self.shown == Some(engine.id()) {
            return None;
        }
        self.shown = Some(engine.id());
        (engine.phase() == FetchPhase::Empty).then_some(AppEvent::LoadTimeline)
    }
}
