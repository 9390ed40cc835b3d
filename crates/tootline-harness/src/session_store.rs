//! In-memory [`SessionStore`].

use tootline_app::SessionStore;
use tootline_client::{Session, SessionError};

/// A session store with a fixed answer.
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    answer: Result<Option<Session>, SessionError>,
}

impl MemorySessionStore {
    /// Store holding no session.
    pub fn empty() -> Self {
        Self { answer: Ok(None) }
    }

    /// Store holding `session`.
    pub fn with_session(session: Session) -> Self {
        Self { answer: Ok(Some(session)) }
    }

    /// Store that fails to read.
    pub fn failing(error: SessionError) -> Self {
        Self { answer: Err(error) }
    }
}

impl SessionStore for MemorySessionStore {
    async fn restore(&self) -> Result<Option<Session>, SessionError> {
        self.answer.clone()
    }
}
