//! Page bounds for timeline requests.

use crate::PostId;

/// Pagination bound for one page request.
///
/// At most one side is set per request: `until` asks for posts strictly older
/// than the given id (`max_id`), `since` for posts newer than it (`min_id`).
/// Neither set means "the newest page".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
    /// Return posts newer than this id.
    pub since: Option<PostId>,
    /// Return posts older than this id.
    pub until: Option<PostId>,
}

impl Cursor {
    /// The newest page; no bound.
    pub fn head() -> Self {
        Self::default()
    }

    /// The page strictly older than `id`.
    pub fn older_than(id: PostId) -> Self {
        Self { since: None, until: Some(id) }
    }

    /// The page strictly newer than `id`.
    pub fn newer_than(id: PostId) -> Self {
        Self { since: Some(id), until: None }
    }

    /// True when neither bound is set.
    pub fn is_head(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    /// Query parameters in Mastodon naming.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::with_capacity(1);
        if let Some(since) = &self.since {
            pairs.push(("min_id", since.as_str()));
        }
        if let Some(until) = &self.until {
            pairs.push(("max_id", until.as_str()));
        }
        pairs
    }
}
