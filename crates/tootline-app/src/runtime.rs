//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: screen state machine
//! - [`SessionSignal`]: the observable session value
//! - [`TimelineApi`]: page requests, each spawned onto its own task
//! - [`Driver`]: platform-specific I/O
//!
//! All state lives on the loop task. Background tasks never touch the
//! [`App`]; they report back through a channel and the loop applies their
//! results in arrival order.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tootline_client::TimelineApi;

use crate::{App, AppAction, AppEvent, Driver, FetchRequest, SessionSignal, SessionStore};

/// Capacity of the channel carrying background results to the loop.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Errors that stop the runtime.
#[derive(Error, Debug)]
pub enum RuntimeError<E: std::error::Error + 'static> {
    /// The driver failed.
    #[error("driver error: {0}")]
    Driver(#[source] E),

    /// The session subscription ended.
    #[error("session signal closed")]
    SessionSignalClosed,
}

/// Generic runtime that orchestrates App, session signal, API and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `A`: Home timeline client
/// - `S`: Persisted session source
pub struct Runtime<D, A, S>
where
    D: Driver,
    A: TimelineApi,
    S: SessionStore,
{
    driver: D,
    app: App,
    api: Arc<A>,
    store: Arc<S>,
    sessions: SessionSignal,
    events_tx: mpsc::Sender<AppEvent>,
    events_rx: mpsc::Receiver<AppEvent>,
}

impl<D, A, S> Runtime<D, A, S>
where
    D: Driver,
    A: TimelineApi,
    S: SessionStore,
{
    /// Create a runtime with a fresh session signal.
    pub fn new(driver: D, api: A, store: S) -> Self {
        Self::with_signal(driver, api, store, SessionSignal::new())
    }

    /// Create a runtime observing an existing session signal.
    ///
    /// Other holders of `sessions` (a login flow, a test) can publish or
    /// clear the session while the runtime is running.
    pub fn with_signal(driver: D, api: A, store: S, sessions: SessionSignal) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            driver,
            app: App::new(),
            api: Arc::new(api),
            store: Arc::new(store),
            sessions,
            events_tx,
            events_rx,
        }
    }

    /// Run the main event loop until the App asks to quit, then stop the
    /// driver (also on error).
    ///
    /// Each turn waits for the first of, in priority order:
    /// 1. A session change
    /// 2. A finished background task (restore or fetch)
    /// 3. Driver input
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails or the session signal closes.
    pub async fn run(mut self) -> Result<(), RuntimeError<D::Error>> {
        let result = self.event_loop().await;
        self.driver.stop();
        result
    }

    async fn event_loop(&mut self) -> Result<(), RuntimeError<D::Error>> {
        let mut session_rx = self.sessions.subscribe();

        let actions = self.app.start();
        if self.process_actions(actions)? {
            return Ok(());
        }

        loop {
            let event = tokio::select! {
                biased;

                changed = session_rx.recv() => {
                    let session = changed.ok_or(RuntimeError::SessionSignalClosed)?;
                    Some(AppEvent::SessionChanged(session))
                },
                Some(event) = self.events_rx.recv() => Some(event),
                polled = self.driver.poll_event() => polled.map_err(RuntimeError::Driver)?,
            };

            let Some(event) = event else {
                continue;
            };

            let actions = self.app.handle(event);
            if self.process_actions(actions)? {
                return Ok(());
            }
        }
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, RuntimeError<D::Error>> {
        for action in actions {
            match action {
                AppAction::Render => {
                    self.driver.render(&self.app).map_err(RuntimeError::Driver)?;
                },
                AppAction::Quit => return Ok(true),
                AppAction::RestoreSession => self.spawn_restore(),
                AppAction::Fetch(request) => self.spawn_fetch(request),
                AppAction::ReportError(error) => self.driver.report_error(&error),
                AppAction::InvalidateSession { session } => {
                    self.sessions.invalidate(&session);
                },
            }
        }
        Ok(false)
    }

    /// Restore the persisted session, then report `RestoreFinished`.
    ///
    /// The signal is updated before `RestoreFinished` is sent, and session
    /// changes are polled first, so the App sees the restored session before
    /// it leaves the startup screen.
    fn spawn_restore(&self) {
        let store = Arc::clone(&self.store);
        let sessions = self.sessions.clone();
        let events = self.events_tx.clone();

        tokio::spawn(async move {
            sessions.restore(store.as_ref()).await;
            if events.send(AppEvent::RestoreFinished).await.is_err() {
                tracing::debug!("runtime stopped before restore finished");
            }
        });
    }

    /// Execute a page request on its own task.
    ///
    /// The task is never cancelled; if the requesting engine has been
    /// replaced by the time it finishes, the App drops the result.
    fn spawn_fetch(&self, request: FetchRequest) {
        let api = Arc::clone(&self.api);
        let events = self.events_tx.clone();
        tracing::debug!(
            engine = %request.engine,
            request = %request.request,
            cursor = ?request.cursor,
            "spawning page fetch"
        );

        tokio::spawn(async move {
            let result = api.fetch_timeline(&request.session, &request.cursor).await;
            let completion = request.complete(result);
            if events.send(AppEvent::FetchCompleted(completion)).await.is_err() {
                tracing::debug!("runtime stopped before fetch finished");
            }
        });
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get the session signal observed by this runtime
    pub fn sessions(&self) -> &SessionSignal {
        &self.sessions
    }
}
