//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use std::sync::Arc;

use tootline_client::{ApiError, Session};

use crate::FetchRequest;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Restore a persisted session, then report `RestoreFinished`.
    RestoreSession,

    /// Execute a page request off the event loop.
    Fetch(FetchRequest),

    /// Surface a failed page request to the user.
    ReportError(ApiError),

    /// Clear the session signal if it still holds `session`.
    InvalidateSession {
        /// Session to drop.
        session: Arc<Session>,
    },
}
