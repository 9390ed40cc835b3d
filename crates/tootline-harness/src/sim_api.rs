//! In-memory implementations of [`TimelineApi`].
//!
//! - [`SimTimelineApi`] answers immediately from a fixed home timeline, with
//!   failure injection and revoked tokens.
//! - [`ScriptedApi`] parks every fetch until the test resolves it, which
//!   makes completion order (and therefore races) fully deterministic.

#![allow(clippy::unwrap_used, reason = "Poisoned harness locks abort the test")]

use std::{
    collections::{HashSet, VecDeque},
    sync::{Arc, Mutex},
};

use tokio::sync::{Notify, oneshot};
use tootline_client::{Account, ApiError, Cursor, Post, PostId, Session, TimelineApi};

/// Default page size, matching the HTTP client default.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// One call observed by a simulated API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    /// Session the call was made with.
    pub session: Session,
    /// Requested page bound.
    pub cursor: Cursor,
}

#[derive(Debug)]
struct SimTimelineState {
    /// Newest first.
    posts: Vec<Post>,
    page_size: usize,
    failures: VecDeque<ApiError>,
    revoked: HashSet<Session>,
    calls: Vec<FetchCall>,
}

/// A home timeline held in memory.
///
/// Cloning yields another handle to the same timeline, so a test can keep
/// one handle for inspection after moving the other into a runtime.
#[derive(Debug, Clone)]
pub struct SimTimelineApi {
    state: Arc<Mutex<SimTimelineState>>,
}

impl SimTimelineApi {
    /// Timeline of `count` posts with ids `count..=1`, newest first.
    pub fn with_posts(count: u64) -> Self {
        let posts = (1..=count)
            .rev()
            .map(|id| {
                Post::new(id.to_string(), Account::new("1", "alice"))
                    .with_content(format!("<p>post {id}</p>"))
            })
            .collect();
        Self::from_posts(posts)
    }

    /// Timeline of the given posts. They are sorted newest first.
    pub fn from_posts(mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        Self {
            state: Arc::new(Mutex::new(SimTimelineState {
                posts,
                page_size: DEFAULT_PAGE_SIZE,
                failures: VecDeque::new(),
                revoked: HashSet::new(),
                calls: Vec::new(),
            })),
        }
    }

    /// Set the number of posts per page.
    #[must_use]
    pub fn with_page_size(self, page_size: usize) -> Self {
        self.state.lock().unwrap().page_size = page_size.max(1);
        self
    }

    /// Fail the next `times` calls with `error`.
    pub fn fail_next(&self, error: ApiError, times: usize) {
        let mut state = self.state.lock().unwrap();
        state.failures.extend(std::iter::repeat_n(error, times));
    }

    /// Reject every later call made with `session` as unauthorized.
    pub fn revoke(&self, session: &Session) {
        self.state.lock().unwrap().revoked.insert(session.clone());
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<FetchCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Page the server would return for `cursor`, newest first.
    pub fn page(&self, cursor: &Cursor) -> Vec<Post> {
        let state = self.state.lock().unwrap();
        page_of(&state.posts, cursor, state.page_size)
    }
}

fn page_of(posts: &[Post], cursor: &Cursor, page_size: usize) -> Vec<Post> {
    let older = |id: &PostId| cursor.until.as_ref().is_none_or(|until| id < until);
    let newer = |id: &PostId| cursor.since.as_ref().is_none_or(|since| id > since);
    let matching: Vec<&Post> = posts.iter().filter(|p| older(&p.id) && newer(&p.id)).collect();

    // `since` pages grow upward from the bound: keep the oldest matches.
    let skip = if cursor.since.is_some() { matching.len().saturating_sub(page_size) } else { 0 };
    matching.into_iter().skip(skip).take(page_size).cloned().collect()
}

impl TimelineApi for SimTimelineApi {
    async fn fetch_timeline(&self, session: &Session, cursor: &Cursor) -> Result<Vec<Post>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(FetchCall { session: session.clone(), cursor: cursor.clone() });

        if let Some(error) = state.failures.pop_front() {
            tracing::debug!(%error, "injected failure");
            return Err(error);
        }
        if state.revoked.contains(session) {
            return Err(ApiError::Auth { status: 401 });
        }
        Ok(page_of(&state.posts, cursor, state.page_size))
    }
}

/// A fetch parked inside [`ScriptedApi`], waiting for its result.
#[derive(Debug)]
pub struct PendingFetch {
    /// Session the call was made with.
    pub session: Session,
    /// Requested page bound.
    pub cursor: Cursor,
    reply: oneshot::Sender<Result<Vec<Post>, ApiError>>,
}

impl PendingFetch {
    /// Complete the parked fetch with `result`.
    pub fn resolve(self, result: Result<Vec<Post>, ApiError>) {
        if self.reply.send(result).is_err() {
            tracing::debug!("scripted fetch resolved after its caller went away");
        }
    }
}

#[derive(Debug, Default)]
struct ScriptedShared {
    pending: Mutex<VecDeque<PendingFetch>>,
    arrived: Notify,
}

/// A [`TimelineApi`] whose calls complete only when the test says so.
#[derive(Debug, Clone, Default)]
pub struct ScriptedApi {
    shared: Arc<ScriptedShared>,
}

impl ScriptedApi {
    /// Create an API with no parked fetches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the next fetch to arrive and take it.
    pub async fn next_fetch(&self) -> PendingFetch {
        loop {
            let next = self.shared.pending.lock().unwrap().pop_front();
            if let Some(fetch) = next {
                return fetch;
            }
            self.shared.arrived.notified().await;
        }
    }

    /// Number of fetches parked and not yet taken.
    pub fn parked(&self) -> usize {
        self.shared.pending.lock().unwrap().len()
    }
}

impl TimelineApi for ScriptedApi {
    async fn fetch_timeline(&self, session: &Session, cursor: &Cursor) -> Result<Vec<Post>, ApiError> {
        let (reply, result) = oneshot::channel();
        self.shared.pending.lock().unwrap().push_back(PendingFetch {
            session: session.clone(),
            cursor: cursor.clone(),
            reply,
        });
        self.shared.arrived.notify_one();

        result
            .await
            .unwrap_or_else(|_| Err(ApiError::Transport("scripted fetch abandoned".into())))
    }
}
