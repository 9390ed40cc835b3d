//! Session source backed by command-line arguments.

use tootline_app::SessionStore;
use tootline_client::{Session, SessionError};

/// Restores the session given on the command line (or in the environment).
#[derive(Debug, Clone, Default)]
pub struct ArgsSessionStore {
    instance: Option<String>,
    token: Option<String>,
}

impl ArgsSessionStore {
    /// Store for the given instance and token.
    pub fn new(instance: Option<String>, token: Option<String>) -> Self {
        Self { instance, token }
    }
}

impl SessionStore for ArgsSessionStore {
    async fn restore(&self) -> Result<Option<Session>, SessionError> {
        match (&self.instance, &self.token) {
            (None, None) => Ok(None),
            (Some(instance), Some(token)) => Session::new(instance, token).map(Some),
            (Some(_), None) => Err(SessionError::MissingToken),
            (None, Some(_)) => Err(SessionError::InvalidInstance(String::new())),
        }
    }
}
