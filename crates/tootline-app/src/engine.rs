//! Timeline pagination engine.
//!
//! This module defines [`TimelineEngine`], the per-session owner of one home
//! timeline. It is a pure state machine: `load` and `load_next_page` return a
//! [`FetchRequest`] for the runtime to execute (or `None` when the call must be
//! a no-op), and [`TimelineEngine::complete`] folds the result back in.
//!
//! # Phases
//!
//! ```text
//! Empty --load--> Loading --ok--> Loaded --load_next_page--> Loading --ok--> Loaded
//!                    |                                          |
//!                    +--err (no posts)--> Empty                 +--err--> Loaded
//! ```
//!
//! `Loading` is a mutual-exclusion flag: while a request is outstanding every
//! other `load*` call is a no-op, so callers may ask for the next page as
//! often as they like.

use std::{fmt, sync::Arc};

use tootline_client::{ApiError, Cursor, Post, Session};

/// Identity of one engine instance. Never reused within an [`crate::App`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineId(pub u64);

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine#{}", self.0)
    }
}

/// Identity of one page request within an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req#{}", self.0)
    }
}

/// Request-in-flight status of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchPhase {
    /// Nothing loaded, nothing outstanding.
    Empty,
    /// One request is outstanding.
    Loading,
    /// At least one page has been applied and nothing is outstanding.
    Loaded,
}

/// A page request the runtime must execute on the engine's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Engine that issued the request.
    pub engine: EngineId,
    /// Request sequence number within that engine.
    pub request: RequestId,
    /// Session the request is authenticated with.
    pub session: Arc<Session>,
    /// Page bound.
    pub cursor: Cursor,
}

impl FetchRequest {
    /// Pair this request with its result.
    pub fn complete(&self, result: Result<Vec<Post>, ApiError>) -> FetchCompletion {
        FetchCompletion { engine: self.engine, request: self.request, result }
    }
}

/// Result of a [`FetchRequest`], routed back to the issuing engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCompletion {
    /// Engine that issued the request.
    pub engine: EngineId,
    /// Request this result answers.
    pub request: RequestId,
    /// Posts in server order, or the failure.
    pub result: Result<Vec<Post>, ApiError>,
}

/// Effect of applying a [`FetchCompletion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Posts were appended; `count` may be zero.
    Appended {
        /// Number of posts appended.
        count: usize,
    },
    /// The request failed; phase has been recovered.
    Failed(ApiError),
    /// The completion was stale or the engine is discarded. Nothing changed.
    Ignored,
}

#[derive(Debug, Clone)]
struct InFlight {
    request: RequestId,
    cursor: Cursor,
}

/// Accumulated posts and fetch phase for one session's home timeline.
///
/// The post list is append-only for the lifetime of the engine.
#[derive(Debug)]
pub struct TimelineEngine {
    id: EngineId,
    session: Arc<Session>,
    posts: Vec<Post>,
    phase: FetchPhase,
    in_flight: Option<InFlight>,
    next_request: u64,
    exhausted: bool,
    discarded: bool,
}

impl TimelineEngine {
    /// Create an empty engine bound to `session`.
    pub fn new(id: EngineId, session: Arc<Session>) -> Self {
        Self {
            id,
            session,
            posts: Vec::new(),
            phase: FetchPhase::Empty,
            in_flight: None,
            next_request: 0,
            exhausted: false,
            discarded: false,
        }
    }

    /// Request the newest page.
    ///
    /// Only valid in [`FetchPhase::Empty`]; returns `None` otherwise.
    pub fn load(&mut self) -> Option<FetchRequest> {
        if self.discarded || self.phase != FetchPhase::Empty {
            tracing::trace!(engine = %self.id, phase = ?self.phase, "load ignored");
            return None;
        }
        Some(self.begin(Cursor::head()))
    }

    /// Request the page older than the last loaded post.
    ///
    /// Only valid in [`FetchPhase::Loaded`] with at least one post and before
    /// the end of the timeline was reached; returns `None` otherwise.
    pub fn load_next_page(&mut self) -> Option<FetchRequest> {
        if self.discarded || self.phase != FetchPhase::Loaded || self.exhausted {
            tracing::trace!(engine = %self.id, phase = ?self.phase, "next page ignored");
            return None;
        }
        let last = self.posts.last()?.id.clone();
        Some(self.begin(Cursor::older_than(last)))
    }

    fn begin(&mut self, cursor: Cursor) -> FetchRequest {
        self.next_request += 1;
        let request = RequestId(self.next_request);

        self.phase = FetchPhase::Loading;
        self.in_flight = Some(InFlight { request, cursor: cursor.clone() });
        tracing::debug!(engine = %self.id, %request, ?cursor, "page request issued");

        FetchRequest { engine: self.id, request, session: Arc::clone(&self.session), cursor }
    }

    /// Apply the result of an outstanding request.
    ///
    /// Completions for another engine, for a request that is not the
    /// outstanding one, or arriving after [`TimelineEngine::discard`] are
    /// ignored without touching any state.
    pub fn complete(&mut self, completion: FetchCompletion) -> FetchOutcome {
        if self.discarded {
            tracing::debug!(engine = %self.id, request = %completion.request, "engine discarded, completion dropped");
            return FetchOutcome::Ignored;
        }

        let matches = completion.engine == self.id
            && self.in_flight.as_ref().is_some_and(|f| f.request == completion.request);
        if !matches {
            tracing::warn!(
                engine = %self.id,
                from = %completion.engine,
                request = %completion.request,
                "completion does not match outstanding request"
            );
            return FetchOutcome::Ignored;
        }

        let Some(in_flight) = self.in_flight.take() else {
            return FetchOutcome::Ignored;
        };

        match completion.result {
            Ok(page) => {
                let count = page.len();
                if count == 0 && !in_flight.cursor.is_head() {
                    self.exhausted = true;
                    tracing::debug!(engine = %self.id, "reached end of timeline");
                }
                self.posts.extend(page);
                self.phase = FetchPhase::Loaded;
                tracing::debug!(engine = %self.id, count, total = self.posts.len(), "page applied");
                FetchOutcome::Appended { count }
            },
            Err(error) => {
                self.phase =
                    if self.posts.is_empty() { FetchPhase::Empty } else { FetchPhase::Loaded };
                tracing::warn!(engine = %self.id, %error, phase = ?self.phase, "page request failed");
                FetchOutcome::Failed(error)
            },
        }
    }

    /// Mark the engine inert.
    ///
    /// After this, `load*` calls are no-ops and every completion is ignored.
    pub fn discard(&mut self) {
        self.discarded = true;
    }

    /// Engine identity.
    pub fn id(&self) -> EngineId {
        self.id
    }

    /// Session this engine is bound to.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Posts in display order (newest first).
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Current fetch phase.
    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    /// Outstanding request, if any.
    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight.as_ref().map(|f| f.request)
    }

    /// True once an older page came back empty.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// True after [`TimelineEngine::discard`].
    pub fn is_discarded(&self) -> bool {
        self.discarded
    }
}
