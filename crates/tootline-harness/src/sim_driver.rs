//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`tootline_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! The driver is moved into the runtime; tests keep a [`SimHandle`] to inject
//! input and to wait for rendered frames.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Harness failures abort the test")]

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::{Notify, watch};
use tootline_app::{App, AppEvent, AppearanceTracker, Driver};
use tootline_client::ApiError;

use crate::invariants::{InvariantRegistry, SystemSnapshot};

/// Error type for simulation driver.
#[derive(Error, Debug, Clone)]
#[error("sim driver: {0}")]
pub struct SimDriverError(pub String);

#[derive(Debug, Default)]
struct SharedState {
    pending_events: std::collections::VecDeque<AppEvent>,
    renders: Vec<SystemSnapshot>,
    errors: Vec<ApiError>,
    fail_render: Option<String>,
    stopped: bool,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<SharedState>,
    event_ready: Notify,
    rendered: watch::Sender<usize>,
}

/// Simulation driver for deterministic testing.
///
/// Every render is captured as a [`SystemSnapshot`] and, when enabled,
/// checked against the invariant registry.
pub struct SimDriver {
    shared: Arc<Shared>,
    invariants: Option<InvariantRegistry>,
    appearance: Option<AppearanceTracker>,
    observed: SystemSnapshot,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a new simulation driver.
    pub fn new() -> Self {
        let (rendered, _) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SharedState::default()),
                event_ready: Notify::new(),
                rendered,
            }),
            invariants: None,
            appearance: None,
            observed: SystemSnapshot::empty(),
        }
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// Request the first page whenever a new timeline is rendered, like the
    /// terminal driver does.
    #[must_use]
    pub fn with_auto_load(mut self) -> Self {
        self.appearance = Some(AppearanceTracker::new());
        self
    }

    /// Handle for driving this driver from a test.
    pub fn handle(&self) -> SimHandle {
        SimHandle { shared: Arc::clone(&self.shared), cursor: 0 }
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        loop {
            let next = self.shared.state.lock().unwrap().pending_events.pop_front();
            if next.is_some() {
                return Ok(next);
            }
            self.shared.event_ready.notified().await;
        }
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.observed.observe(app);
        if let Some(registry) = &self.invariants {
            registry.assert_all(&self.observed, "after render");
        }

        let follow_up = self.appearance.as_mut().and_then(|tracker| tracker.observe(app));
        let queued = follow_up.is_some();
        {
            let mut state = self.shared.state.lock().unwrap();
            if let Some(reason) = state.fail_render.take() {
                return Err(SimDriverError(reason));
            }
            let mut frame = self.observed.clone();
            frame.timeline_history.clear();
            state.renders.push(frame);
            state.pending_events.extend(follow_up);
        }

        if queued {
            self.shared.event_ready.notify_one();
        }
        self.shared.rendered.send_modify(|count| *count += 1);
        Ok(())
    }

    fn report_error(&mut self, error: &ApiError) {
        self.shared.state.lock().unwrap().errors.push(error.clone());
    }

    fn stop(&mut self) {
        self.shared.state.lock().unwrap().stopped = true;
    }
}

/// Test-side handle to a [`SimDriver`].
///
/// Each handle keeps its own read position in the render log, so successive
/// waits observe frames in order and never match the same frame twice.
#[derive(Debug)]
pub struct SimHandle {
    shared: Arc<Shared>,
    cursor: usize,
}

impl Clone for SimHandle {
    fn clone(&self) -> Self {
        Self { shared: Arc::clone(&self.shared), cursor: self.cursor }
    }
}

impl SimHandle {
    /// Queue an input event.
    pub fn inject(&self, event: AppEvent) {
        self.shared.state.lock().unwrap().pending_events.push_back(event);
        self.shared.event_ready.notify_one();
    }

    /// Make the next render fail with `reason`.
    pub fn fail_next_render(&self, reason: impl Into<String>) {
        self.shared.state.lock().unwrap().fail_render = Some(reason.into());
    }

    /// Wait for the first not-yet-consumed frame matching `predicate`.
    ///
    /// Frames before the match are skipped.
    pub async fn wait_for_render<F>(&mut self, predicate: F) -> SystemSnapshot
    where
        F: Fn(&SystemSnapshot) -> bool,
    {
        let mut rendered = self.shared.rendered.subscribe();
        loop {
            let found = {
                let state = self.shared.state.lock().unwrap();
                let start = self.cursor;
                match state.renders[start..].iter().position(&predicate) {
                    Some(offset) => {
                        self.cursor = start + offset + 1;
                        Some(state.renders[start + offset].clone())
                    },
                    None => {
                        self.cursor = state.renders.len();
                        None
                    },
                }
            };
            if let Some(frame) = found {
                return frame;
            }
            rendered.changed().await.expect("driver dropped");
        }
    }

    /// All frames rendered so far.
    pub fn renders(&self) -> Vec<SystemSnapshot> {
        self.shared.state.lock().unwrap().renders.clone()
    }

    /// Most recent frame.
    pub fn last_render(&self) -> Option<SystemSnapshot> {
        self.shared.state.lock().unwrap().renders.last().cloned()
    }

    /// Errors reported so far.
    pub fn errors(&self) -> Vec<ApiError> {
        self.shared.state.lock().unwrap().errors.clone()
    }

    /// True once the runtime has stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.shared.state.lock().unwrap().stopped
    }
}

#[cfg(test)]
mod tests {
    use tootline_app::ScreenKind;

    use super::*;

    #[tokio::test]
    async fn injected_events_are_polled_in_order() {
        let mut driver = SimDriver::new();
        let handle = driver.handle();
        handle.inject(AppEvent::Tick);
        handle.inject(AppEvent::Quit);

        assert!(matches!(driver.poll_event().await, Ok(Some(AppEvent::Tick))));
        assert!(matches!(driver.poll_event().await, Ok(Some(AppEvent::Quit))));
    }

    #[tokio::test]
    async fn wait_for_render_consumes_frames() {
        let mut driver = SimDriver::new().with_invariants(InvariantRegistry::standard());
        let mut handle = driver.handle();
        let mut app = App::new();

        driver.render(&app).unwrap();
        app.start();
        app.handle(AppEvent::RestoreFinished);
        driver.render(&app).unwrap();

        let frame = handle.wait_for_render(|f| f.screen == ScreenKind::Onboarding).await;
        assert!(frame.restored);
        assert_eq!(handle.renders().len(), 2);
    }

    #[test]
    fn failed_render_is_reported_once() {
        let mut driver = SimDriver::new();
        let handle = driver.handle();
        let app = App::new();

        handle.fail_next_render("boom");
        assert!(driver.render(&app).is_err());
        assert!(driver.render(&app).is_ok());
    }
}
