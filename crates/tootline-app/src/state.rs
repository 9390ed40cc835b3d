//! Screen state.
//!
//! Exactly one [`Screen`] is current at a time. The timeline screen owns its
//! [`TimelineEngine`]; replacing the screen drops the engine.

use crate::TimelineEngine;

/// The screen currently shown.
#[derive(Debug)]
pub enum Screen {
    /// Startup; the persisted session has not been restored yet.
    Starting,
    /// No session; the user must log in.
    Onboarding,
    /// Home timeline of the current session.
    Timeline(TimelineEngine),
}

/// Discriminant of [`Screen`], for logging and comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    /// See [`Screen::Starting`].
    Starting,
    /// See [`Screen::Onboarding`].
    Onboarding,
    /// See [`Screen::Timeline`].
    Timeline,
}

impl Screen {
    /// Which screen this is.
    pub fn kind(&self) -> ScreenKind {
        match self {
            Self::Starting => ScreenKind::Starting,
            Self::Onboarding => ScreenKind::Onboarding,
            Self::Timeline(_) => ScreenKind::Timeline,
        }
    }

    /// The timeline engine, when on the timeline screen.
    pub fn timeline(&self) -> Option<&TimelineEngine> {
        match self {
            Self::Timeline(engine) => Some(engine),
            _ => None,
        }
    }

    pub(crate) fn timeline_mut(&mut self) -> Option<&mut TimelineEngine> {
        match self {
            Self::Timeline(engine) => Some(engine),
            _ => None,
        }
    }
}
