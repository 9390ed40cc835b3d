//! Observable session value.
//!
//! [`SessionSignal`] publishes the current [`Session`] (or its absence) to
//! every subscriber. Equal values are filtered out, so an equal session never
//! rebuilds the timeline, but every actual change reaches every subscriber in
//! order: a logout followed by a login of the same account is two changes.

use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::sync::mpsc;
use tootline_client::{Session, SessionError};

/// Receiving end of a [`SessionSignal`] subscription.
pub type SessionChanges = mpsc::UnboundedReceiver<Option<Arc<Session>>>;

/// Source of a previously persisted session.
pub trait SessionStore: Send + Sync + 'static {
    /// Load the persisted session, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Unavailable`] when the store cannot be read.
    fn restore(&self) -> impl Future<Output = Result<Option<Session>, SessionError>> + Send;
}

#[derive(Debug, Default)]
struct SignalState {
    current: Option<Arc<Session>>,
    subscribers: Vec<mpsc::UnboundedSender<Option<Arc<Session>>>>,
}

impl SignalState {
    /// Store `next` and deliver it to every live subscriber.
    fn publish(&mut self, next: Option<Arc<Session>>) {
        self.subscribers.retain(|tx| tx.send(next.clone()).is_ok());
        self.current = next;
    }
}

/// Broadcast of the current session value.
///
/// Cloning yields another handle to the same signal.
#[derive(Debug, Clone, Default)]
pub struct SessionSignal {
    state: Arc<Mutex<SignalState>>,
}

impl SessionSignal {
    /// Create a signal holding no session.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SignalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe to changes.
    ///
    /// The current value is delivered first, followed by every later change
    /// in the order it was made.
    pub fn subscribe(&self) -> SessionChanges {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.lock();
        if tx.send(state.current.clone()).is_ok() {
            state.subscribers.push(tx);
        }
        rx
    }

    /// Current value.
    pub fn current(&self) -> Option<Arc<Session>> {
        self.lock().current.clone()
    }

    /// Publish `session`.
    ///
    /// Returns `true` if the value changed and subscribers were notified.
    pub fn replace(&self, session: Option<Session>) -> bool {
        let next = session.map(Arc::new);
        let mut state = self.lock();
        if state.current.as_deref() == next.as_deref() {
            return false;
        }
        let logged_in = next.is_some();
        state.publish(next);
        drop(state);

        tracing::info!(logged_in, "session changed");
        true
    }

    /// Clear the signal if it still holds `session`.
    ///
    /// A session that has already been replaced is left alone. Returns `true`
    /// if the signal was cleared.
    pub fn invalidate(&self, session: &Session) -> bool {
        let mut state = self.lock();
        if state.current.as_deref() != Some(session) {
            return false;
        }
        state.publish(None);
        drop(state);

        tracing::info!(instance = session.instance(), "session invalidated");
        true
    }

    /// Publish the session persisted in `store`.
    ///
    /// A store failure is logged and treated as "no session". Returns `true`
    /// if a session was restored.
    pub async fn restore<S: SessionStore>(&self, store: &S) -> bool {
        match store.restore().await {
            Ok(Some(session)) => {
                tracing::info!(instance = session.instance(), "session restored");
                self.replace(Some(session));
                true
            },
            Ok(None) => {
                tracing::debug!("no persisted session");
                false
            },
            Err(error) => {
                tracing::warn!(%error, "session restore failed; continuing without session");
                false
            },
        }
    }
}
