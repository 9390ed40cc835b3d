//! Terminal UI for tootline
//!
//! A thin shell over [`tootline_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`tootline_app::Runtime`].
//!
//! This crate handles terminal rendering, command-line arguments, and the
//! session source backed by them.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod session_store;
pub mod terminal;
pub mod text;
pub mod ui;

pub use cli::Args;
pub use session_store::ArgsSessionStore;
pub use terminal::{TerminalDriver, TerminalError};
pub use tootline_app::{App, AppEvent, Driver, KeyInput, Runtime};
