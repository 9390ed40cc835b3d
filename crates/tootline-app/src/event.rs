//! Application input events.
//!
//! This module defines [`AppEvent`], the set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from three sources:
//! - User interactions (keys, resize) and ticks, via the driver.
//! - The session signal, forwarded by the runtime.
//! - Finished fetch tasks, forwarded by the runtime.

use std::sync::Arc;

use tootline_client::Session;

use crate::{FetchCompletion, KeyInput};

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// The observed session value changed. `None` means logged out.
    SessionChanged(Option<Arc<Session>>),

    /// The startup restore attempt finished, successfully or not.
    RestoreFinished,

    /// The timeline screen became visible; request the newest page.
    LoadTimeline,

    /// The user neared the end of the list; request the next older page.
    LoadNextPage,

    /// A page request finished.
    FetchCompleted(FetchCompletion),

    /// Drop the current session.
    Logout,

    /// Exit the application.
    Quit,
}
