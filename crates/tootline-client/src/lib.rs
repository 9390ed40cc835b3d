//! Client
//!
//! Mastodon API surface consumed by the Tootline core: the authenticated
//! [`Session`], the decoded [`Post`] model, the pagination [`Cursor`] and the
//! [`TimelineApi`] trait that executes one home-timeline page request.
//!
//! # Architecture
//!
//! The core never talks HTTP directly. It describes a page request
//! (session + cursor) and hands it to a [`TimelineApi`] implementation. The
//! harness provides in-memory implementations; production uses the HTTP one.
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::HttpTimelineApi`]: `reqwest`-backed home timeline client
//! - [`transport::HttpConfig`]: timeout, page size and user agent

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod api;
mod cursor;
mod error;
mod post;
mod session;

#[cfg(feature = "transport")]
pub mod transport;

pub use api::{TimelineApi, decode_page};
pub use cursor::Cursor;
pub use error::{ApiError, ErrorKind};
pub use post::{
    Account, CardKind, MediaAttachment, MediaKind, Post, PostId, PreviewCard, UsernameParts,
};
pub use session::{AccessToken, Session, SessionError};
