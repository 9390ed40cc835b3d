//! Application layer for Tootline
//!
//! Pure state machines and a generic runtime for the home timeline client,
//! enabling deterministic simulation testing with the same code that runs in
//! production.
//!
//! # Components
//!
//! - [`App`]: screen state machine (session-driven screen, key handling)
//! - [`TimelineEngine`]: per-session pagination of the home timeline
//! - [`SessionSignal`]: observable session value delivering every change
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod driver;
mod engine;
mod event;
mod input;
mod runtime;
mod session;
mod state;

pub use action::AppAction;
pub use app::{App, PREFETCH_MARGIN};
pub use driver::{AppearanceTracker, Driver};
pub use engine::{
    EngineId, FetchCompletion, FetchOutcome, FetchPhase, FetchRequest, RequestId, TimelineEngine,
};
pub use event::AppEvent;
pub use input::KeyInput;
pub use runtime::{Runtime, RuntimeError};
pub use session::{SessionChanges, SessionSignal, SessionStore};
pub use state::{Screen, ScreenKind};
