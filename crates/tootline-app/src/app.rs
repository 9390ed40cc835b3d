//! Application state machine.
//!
//! This module defines the [`App`] state machine, which decides which screen
//! is shown from the current session value and routes timeline work to the
//! [`TimelineEngine`] bound to that session.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Holds exactly one [`Screen`] and swaps it when the session changes.
//! - Owns the timeline engine; completions reach it only by [`EngineId`].
//! - Tracks list selection and asks for older pages near the end of the list.
//! - Stores terminal dimensions and the last error for the status line.

use std::sync::Arc;

use tootline_client::Session;

use crate::{
    AppAction, AppEvent, EngineId, FetchCompletion, FetchOutcome, FetchRequest, KeyInput, Screen,
    TimelineEngine,
};

/// Rows from the end of the list at which the next page is requested.
pub const PREFETCH_MARGIN: usize = 3;

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug)]
pub struct App {
    /// Current screen.
    screen: Screen,
    /// `start()` has been called.
    started: bool,
    /// The startup restore has finished; session changes now apply.
    restored: bool,
    /// Latest observed session value.
    latest_session: Option<Arc<Session>>,
    /// Engines created so far; the next engine id.
    engines_created: u64,
    /// Selected row in the timeline.
    selected: usize,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create an App on the startup screen.
    pub fn new() -> Self {
        Self {
            screen: Screen::Starting,
            started: false,
            restored: false,
            latest_session: None,
            engines_created: 0,
            selected: 0,
            terminal_size: (80, 24),
            status_message: None,
        }
    }

    /// Begin startup: restore the persisted session and draw the first frame.
    ///
    /// Only the first call has an effect.
    pub fn start(&mut self) -> Vec<AppAction> {
        if self.started {
            return vec![];
        }
        self.started = true;
        vec![AppAction::RestoreSession, AppAction::Render]
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::SessionChanged(session) => {
                self.latest_session = session;
                if !self.restored {
                    tracing::debug!("session change before restore finished; deferred");
                    return vec![];
                }
                if self.apply_session() { vec![AppAction::Render] } else { vec![] }
            },
            AppEvent::RestoreFinished => {
                if self.restored {
                    return vec![];
                }
                self.restored = true;
                self.apply_session();
                vec![AppAction::Render]
            },
            AppEvent::LoadTimeline => self.load_timeline(),
            AppEvent::LoadNextPage => self.load_next_page(),
            AppEvent::FetchCompleted(completion) => self.complete_fetch(completion),
            AppEvent::Logout => self.logout(),
            AppEvent::Quit => self.quit(),
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Char('q') | KeyInput::Esc => self.quit(),
            KeyInput::Char('L') => self.logout(),
            KeyInput::Char('r') => self.load_timeline(),
            KeyInput::Char('j') | KeyInput::Down => self.select(self.selected.saturating_add(1)),
            KeyInput::Char('k') | KeyInput::Up => self.select(self.selected.saturating_sub(1)),
            KeyInput::Char('g') | KeyInput::Home => self.select(0),
            KeyInput::Char('G') | KeyInput::End => self.select(usize::MAX),
            KeyInput::Char(_) => vec![],
        }
    }

    /// Move the selection, prefetching when it lands near the end.
    fn select(&mut self, index: usize) -> Vec<AppAction> {
        let len = self.screen.timeline().map_or(0, |engine| engine.posts().len());
        if len == 0 {
            return vec![];
        }
        self.selected = index.min(len - 1);

        let mut actions = Vec::with_capacity(2);
        if self.selected + PREFETCH_MARGIN >= len
            && let Some(request) = self.screen.timeline_mut().and_then(TimelineEngine::load_next_page)
        {
            actions.push(AppAction::Fetch(request));
        }
        actions.push(AppAction::Render);
        actions
    }

    /// Request the newest page of the current timeline.
    ///
    /// No-op unless the timeline is shown and empty.
    pub fn load_timeline(&mut self) -> Vec<AppAction> {
        let request = self.screen.timeline_mut().and_then(TimelineEngine::load);
        Self::fetch_actions(request)
    }

    /// Request the next older page of the current timeline.
    ///
    /// No-op unless the timeline is shown and loaded.
    pub fn load_next_page(&mut self) -> Vec<AppAction> {
        let request = self.screen.timeline_mut().and_then(TimelineEngine::load_next_page);
        Self::fetch_actions(request)
    }

    fn fetch_actions(request: Option<FetchRequest>) -> Vec<AppAction> {
        match request {
            Some(request) => vec![AppAction::Fetch(request), AppAction::Render],
            None => vec![],
        }
    }

    /// Drop the session bound to the current timeline.
    pub fn logout(&self) -> Vec<AppAction> {
        match self.screen.timeline() {
            Some(engine) => {
                tracing::info!(engine = %engine.id(), "logout requested");
                vec![AppAction::InvalidateSession { session: Arc::clone(engine.session()) }]
            },
            None => vec![],
        }
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Make the screen reflect `latest_session`.
    ///
    /// Returns `true` if the screen changed.
    fn apply_session(&mut self) -> bool {
        let next = match self.latest_session.clone() {
            None => {
                if matches!(self.screen, Screen::Onboarding) {
                    return false;
                }
                Screen::Onboarding
            },
            Some(session) => {
                if let Screen::Timeline(engine) = &self.screen
                    && engine.session() == &session
                {
                    tracing::debug!(engine = %engine.id(), "equal session re-emitted; keeping timeline");
                    return false;
                }
                self.engines_created += 1;
                Screen::Timeline(TimelineEngine::new(EngineId(self.engines_created), session))
            },
        };

        let previous = std::mem::replace(&mut self.screen, next);
        if let Screen::Timeline(mut engine) = previous {
            engine.discard();
            tracing::debug!(engine = %engine.id(), "timeline engine discarded");
        }

        self.selected = 0;
        self.status_message = None;
        tracing::info!(screen = ?self.screen.kind(), "screen changed");
        true
    }

    fn complete_fetch(&mut self, completion: FetchCompletion) -> Vec<AppAction> {
        let Some(engine) = self.screen.timeline_mut() else {
            tracing::debug!(from = %completion.engine, "no timeline shown; completion dropped");
            return vec![];
        };
        if engine.id() != completion.engine {
            tracing::debug!(
                current = %engine.id(),
                from = %completion.engine,
                "completion from replaced engine dropped"
            );
            return vec![];
        }

        match engine.complete(completion) {
            FetchOutcome::Appended { .. } => {
                self.status_message = None;
                vec![AppAction::Render]
            },
            FetchOutcome::Failed(error) => {
                let mut actions = vec![AppAction::ReportError(error.clone())];
                if error.is_auth() {
                    actions.push(AppAction::InvalidateSession {
                        session: Arc::clone(engine.session()),
                    });
                }
                self.status_message = Some(format!("Failed to load timeline: {error}"));
                actions.push(AppAction::Render);
                actions
            },
            FetchOutcome::Ignored => vec![],
        }
    }

    /// Current screen.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Timeline engine, when the timeline is shown.
    pub fn timeline(&self) -> Option<&TimelineEngine> {
        self.screen.timeline()
    }

    /// Latest observed session value.
    pub fn latest_session(&self) -> Option<&Arc<Session>> {
        self.latest_session.as_ref()
    }

    /// True once the startup restore has finished.
    pub fn is_restored(&self) -> bool {
        self.restored
    }

    /// Selected timeline row.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Status line text. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
