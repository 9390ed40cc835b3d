//! Deterministic simulation harness for Tootline.
//!
//! In-memory implementations of the runtime's collaborators
//! ([`tootline_client::TimelineApi`], [`tootline_app::SessionStore`],
//! [`tootline_app::Driver`]) so the production [`tootline_app::Runtime`] can
//! be exercised without a terminal or a network.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the App
//! invariants.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod invariants;
pub mod session_store;
pub mod sim_api;
pub mod sim_driver;

pub use invariants::{
    AppendOnly, Invariant, InvariantRegistry, InvariantResult, PhaseMatchesPosts,
    ScreenMatchesSession, SingleRequestInFlight, SystemSnapshot, TimelineSnapshot, Violation,
};
pub use session_store::MemorySessionStore;
pub use sim_api::{DEFAULT_PAGE_SIZE, FetchCall, PendingFetch, ScriptedApi, SimTimelineApi};
pub use sim_driver::{SimDriver, SimDriverError, SimHandle};
