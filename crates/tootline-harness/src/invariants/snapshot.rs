//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of the [`App`] at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use std::sync::Arc;

use tootline_app::{App, EngineId, FetchPhase, RequestId, ScreenKind};
use tootline_client::Session;

/// Snapshot of the App's observable state.
#[derive(Debug, Clone)]
pub struct SystemSnapshot {
    /// Screen shown.
    pub screen: ScreenKind,
    /// Startup restore has finished.
    pub restored: bool,
    /// Latest session value the App has observed.
    pub session: Option<Arc<Session>>,
    /// Timeline state, when the timeline is shown.
    pub timeline: Option<TimelineSnapshot>,
    /// Status line text.
    pub status: Option<String>,
    /// Earlier timeline observations, oldest first (for append-only checks).
    pub timeline_history: Vec<TimelineSnapshot>,
}

impl Default for SystemSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl SystemSnapshot {
    /// Snapshot of an App that has not started.
    pub fn empty() -> Self {
        Self {
            screen: ScreenKind::Starting,
            restored: false,
            session: None,
            timeline: None,
            status: None,
            timeline_history: Vec::new(),
        }
    }

    /// Capture the current state of `app`.
    pub fn from_app(app: &App) -> Self {
        Self {
            screen: app.screen().kind(),
            restored: app.is_restored(),
            session: app.latest_session().cloned(),
            timeline: app.timeline().map(|engine| TimelineSnapshot {
                engine: engine.id(),
                session: Arc::clone(engine.session()),
                phase: engine.phase(),
                in_flight: engine.in_flight(),
                post_ids: engine.posts().iter().map(|p| p.id.as_str().to_string()).collect(),
                exhausted: engine.is_exhausted(),
            }),
            status: app.status_message().map(str::to_string),
            timeline_history: Vec::new(),
        }
    }

    /// Replace this snapshot with the current state of `app`, keeping the
    /// previous timeline observation in the history.
    pub fn observe(&mut self, app: &App) {
        let history = std::mem::take(&mut self.timeline_history);
        let previous = self.timeline.take();
        *self = Self::from_app(app);
        self.timeline_history = history;
        self.timeline_history.extend(previous);
    }

    /// Post ids shown, newest first. Empty when no timeline is shown.
    pub fn post_ids(&self) -> Vec<&str> {
        self.timeline
            .as_ref()
            .map(|t| t.post_ids.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Phase of the shown timeline.
    pub fn phase(&self) -> Option<FetchPhase> {
        self.timeline.as_ref().map(|t| t.phase)
    }

    /// Id of the shown timeline engine.
    pub fn engine(&self) -> Option<EngineId> {
        self.timeline.as_ref().map(|t| t.engine)
    }
}

/// Snapshot of one timeline engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineSnapshot {
    /// Engine identity.
    pub engine: EngineId,
    /// Session the engine is bound to.
    pub session: Arc<Session>,
    /// Fetch phase.
    pub phase: FetchPhase,
    /// Outstanding request.
    pub in_flight: Option<RequestId>,
    /// Post ids, newest first.
    pub post_ids: Vec<String>,
    /// End of timeline reached.
    pub exhausted: bool,
}

#[cfg(test)]
mod tests {
    use tootline_app::AppEvent;

    use super::*;

    #[test]
    fn empty_snapshot() {
        let snapshot = SystemSnapshot::empty();
        assert_eq!(snapshot.screen, ScreenKind::Starting);
        assert!(snapshot.timeline.is_none());
        assert!(snapshot.post_ids().is_empty());
    }

    #[test]
    fn observe_keeps_timeline_history() {
        let mut app = App::new();
        app.start();
        let session = Arc::new(Session::new("example.social", "tok").unwrap());
        app.handle(AppEvent::SessionChanged(Some(session)));
        app.handle(AppEvent::RestoreFinished);

        let mut snapshot = SystemSnapshot::from_app(&app);
        app.handle(AppEvent::LoadTimeline);
        snapshot.observe(&app);

        assert_eq!(snapshot.timeline_history.len(), 1);
        assert_eq!(snapshot.timeline_history[0].phase, FetchPhase::Empty);
        assert_eq!(snapshot.phase(), Some(FetchPhase::Loading));
    }
}
