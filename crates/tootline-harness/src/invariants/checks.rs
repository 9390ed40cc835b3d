//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use tootline_app::{FetchPhase, ScreenKind};

use super::{Invariant, InvariantResult, SystemSnapshot, Violation};

/// The screen must follow the session.
///
/// Before restore finishes the App stays on `Starting`. After that, no
/// session means `Onboarding`, and a session means a timeline bound to an
/// equal session.
pub struct ScreenMatchesSession;

impl Invariant for ScreenMatchesSession {
    fn name(&self) -> &'static str {
        "ScreenMatchesSession"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let expected = match (&state.session, state.restored) {
            (_, false) => ScreenKind::Starting,
            (None, true) => ScreenKind::Onboarding,
            (Some(_), true) => ScreenKind::Timeline,
        };
        if state.screen != expected {
            return Err(Violation {
                invariant: self.name(),
                message: format!("screen {:?}, expected {expected:?}", state.screen),
            });
        }

        if let (Some(session), Some(timeline)) = (&state.session, &state.timeline)
            && timeline.session != *session
        {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "{} bound to {}, current session is {}",
                    timeline.engine,
                    timeline.session.instance(),
                    session.instance()
                ),
            });
        }
        Ok(())
    }
}

/// `Loading` if and only if exactly one request is outstanding.
pub struct SingleRequestInFlight;

impl Invariant for SingleRequestInFlight {
    fn name(&self) -> &'static str {
        "SingleRequestInFlight"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let Some(timeline) = &state.timeline else {
            return Ok(());
        };
        let loading = timeline.phase == FetchPhase::Loading;
        if loading != timeline.in_flight.is_some() {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "{}: phase {:?} with outstanding request {:?}",
                    timeline.engine, timeline.phase, timeline.in_flight
                ),
            });
        }
        Ok(())
    }
}

/// An `Empty` timeline holds no posts.
pub struct PhaseMatchesPosts;

impl Invariant for PhaseMatchesPosts {
    fn name(&self) -> &'static str {
        "PhaseMatchesPosts"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let Some(timeline) = &state.timeline else {
            return Ok(());
        };
        if timeline.phase == FetchPhase::Empty && !timeline.post_ids.is_empty() {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "{}: Empty with {} posts",
                    timeline.engine,
                    timeline.post_ids.len()
                ),
            });
        }
        Ok(())
    }
}

/// Posts of one engine are never removed or reordered.
///
/// Every observation of an engine must extend the previous observation of
/// the same engine.
pub struct AppendOnly;

impl Invariant for AppendOnly {
    fn name(&self) -> &'static str {
        "AppendOnly"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let observations: Vec<_> =
            state.timeline_history.iter().chain(state.timeline.as_ref()).collect();

        for pair in observations.windows(2) {
            let (before, after) = (pair[0], pair[1]);
            if before.engine != after.engine {
                continue;
            }
            if !after.post_ids.starts_with(&before.post_ids) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "{}: {:?} is not an extension of {:?}",
                        after.engine, after.post_ids, before.post_ids
                    ),
                });
            }
        }
        Ok(())
    }
}
