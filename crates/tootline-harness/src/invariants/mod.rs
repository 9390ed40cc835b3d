//! Timeline invariants.
//!
//! Each rendered frame is reduced to a [`SystemSnapshot`] and checked against
//! a set of [`Invariant`]s. The snapshot carries the previous timelines too,
//! so properties spanning frames (posts are only ever appended) can be
//! checked without the checker keeping state of its own.
//!
//! ```ignore
//! let mut snapshot = SystemSnapshot::empty();
//! snapshot.observe(&app);
//! InvariantRegistry::standard().check_all(&snapshot)?;
//! ```

#![allow(clippy::panic, reason = "assert_all is the test-failure path")]

mod checks;
mod snapshot;

use thiserror::Error;

pub use checks::{AppendOnly, PhaseMatchesPosts, ScreenMatchesSession, SingleRequestInFlight};
pub use snapshot::{SystemSnapshot, TimelineSnapshot};

/// Outcome of one invariant check.
pub type InvariantResult = Result<(), Violation>;

/// A property that did not hold for a snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{invariant}: {message}")]
pub struct Violation {
    /// Invariant that failed.
    pub invariant: &'static str,
    /// What was observed.
    pub message: String,
}

/// A property of the observable App state.
pub trait Invariant: Send + Sync {
    /// Stable name, used in violation reports.
    fn name(&self) -> &'static str;

    /// Check the property against `state`.
    fn check(&self, state: &SystemSnapshot) -> InvariantResult;
}

/// A set of invariants checked together.
#[derive(Default)]
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// Registry with no invariants.
    pub fn new() -> Self {
        Self::default()
    }

    /// The invariants every timeline run must satisfy:
    /// [`ScreenMatchesSession`], [`SingleRequestInFlight`],
    /// [`PhaseMatchesPosts`] and [`AppendOnly`].
    pub fn standard() -> Self {
        Self::new()
            .with(ScreenMatchesSession)
            .with(SingleRequestInFlight)
            .with(PhaseMatchesPosts)
            .with(AppendOnly)
    }

    /// Builder form of [`InvariantRegistry::add`].
    #[must_use]
    pub fn with<I: Invariant + 'static>(mut self, invariant: I) -> Self {
        self.add(invariant);
        self
    }

    /// Register another invariant.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Names of the registered invariants, in check order.
    pub fn names(&self) -> Vec<&'static str> {
        self.invariants.iter().map(|inv| inv.name()).collect()
    }

    /// Run every invariant and collect all violations.
    pub fn check_all(&self, state: &SystemSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<Violation> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Run every invariant and fail the test on any violation.
    pub fn assert_all(&self, state: &SystemSnapshot, context: &str) {
        let Err(violations) = self.check_all(state) else {
            return;
        };
        let report: Vec<String> = violations.iter().map(ToString::to_string).collect();
        panic!("invariants violated {context} (screen {:?}):\n  {}", state.screen, report.join("\n  "));
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Whether no invariants are registered.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysFails;

    impl Invariant for AlwaysFails {
        fn name(&self) -> &'static str {
            "always_fails"
        }

        fn check(&self, _state: &SystemSnapshot) -> InvariantResult {
            Err(Violation { invariant: self.name(), message: "forced".into() })
        }
    }

    #[test]
    fn standard_registry_order() {
        let registry = InvariantRegistry::standard();
        assert_eq!(registry.names(), [
            "ScreenMatchesSession",
            "SingleRequestInFlight",
            "PhaseMatchesPosts",
            "AppendOnly",
        ]);
    }

    #[test]
    fn empty_snapshot_passes() {
        assert!(InvariantRegistry::standard().check_all(&SystemSnapshot::empty()).is_ok());
    }

    #[test]
    fn violations_are_collected() {
        let registry = InvariantRegistry::standard().with(AlwaysFails);
        let violations = registry.check_all(&SystemSnapshot::empty()).unwrap_err();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].to_string(), "always_fails: forced");
    }

    #[test]
    #[should_panic(expected = "invariants violated after start")]
    fn assert_all_panics_with_context() {
        InvariantRegistry::new().with(AlwaysFails).assert_all(&SystemSnapshot::empty(), "after start");
    }
}
