//! The timeline request seam.

use std::future::Future;

use crate::{ApiError, Cursor, Post, Session};

/// Executes home-timeline page requests.
///
/// Implementations perform exactly one request per call and do not retry.
/// The returned posts are in server order (newest first).
///
/// # Implementations
///
/// - **HTTP**: `transport::HttpTimelineApi` (feature `transport`)
/// - **Simulation**: in-memory timelines in `tootline-harness`
pub trait TimelineApi: Send + Sync + 'static {
    /// Fetch one page of the home timeline for `session`, bounded by `cursor`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] on network failure,
    /// [`ApiError::Auth`] when the token is rejected, and
    /// [`ApiError::Decoding`] when the response is malformed.
    fn fetch_timeline(
        &self,
        session: &Session,
        cursor: &Cursor,
    ) -> impl Future<Output = Result<Vec<Post>, ApiError>> + Send;
}

/// Decode a home timeline response body.
pub fn decode_page(body: &[u8]) -> Result<Vec<Post>, ApiError> {
    Ok(serde_json::from_slice(body)?)
}
