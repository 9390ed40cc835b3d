//! HTTP transport for the home timeline.
//!
//! Provides [`HttpTimelineApi`], a thin `reqwest` layer that turns a
//! [`Session`] + [`Cursor`] into `GET /api/v1/timelines/home` and maps the
//! outcome onto [`ApiError`]. Pagination policy stays in the core.

use std::time::Duration;

use reqwest::{Request, StatusCode};

use crate::{ApiError, Cursor, Post, Session, TimelineApi, decode_page};

/// Home timeline resource, relative to the instance base URL.
const HOME_TIMELINE_PATH: &str = "api/v1/timelines/home";

/// Largest page the Mastodon API serves.
pub const MAX_PAGE_LIMIT: u32 = 40;

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Per-request timeout (connect + response).
    pub timeout: Duration,
    /// Posts per page; clamped to `1..=MAX_PAGE_LIMIT`.
    pub page_limit: u32,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            page_limit: 20,
            user_agent: concat!("tootline/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Home timeline client over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpTimelineApi {
    http: reqwest::Client,
    page_limit: u32,
}

impl HttpTimelineApi {
    /// Build a client from `config`.
    pub fn new(config: HttpConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(transport_error)?;

        Ok(Self { http, page_limit: config.page_limit.clamp(1, MAX_PAGE_LIMIT) })
    }

    /// Effective page size.
    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    /// Build the page request without sending it.
    pub fn home_timeline_request(
        &self,
        session: &Session,
        cursor: &Cursor,
    ) -> Result<Request, ApiError> {
        let limit = self.page_limit.to_string();
        let mut params = vec![("limit", limit.as_str())];
        params.extend(cursor.query_pairs());

        let url = session
            .endpoint(HOME_TIMELINE_PATH)
            .map_err(|e| ApiError::Transport(format!("invalid endpoint: {e}")))?;

        self.http
            .get(url)
            .bearer_auth(session.access_token().expose())
            .query(&params)
            .build()
            .map_err(transport_error)
    }
}

impl TimelineApi for HttpTimelineApi {
    async fn fetch_timeline(
        &self,
        session: &Session,
        cursor: &Cursor,
    ) -> Result<Vec<Post>, ApiError> {
        let request = self.home_timeline_request(session, cursor)?;
        tracing::debug!(url = %request.url(), "requesting home timeline page");

        let response = self.http.execute(request).await.map_err(transport_error)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Auth { status: status.as_u16() });
        }
        if !status.is_success() {
            return Err(ApiError::Transport(format!("unexpected status {status}")));
        }

        let body = response.bytes().await.map_err(transport_error)?;
        decode_page(&body)
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Decoding(err.to_string())
    } else {
        ApiError::Transport(err.to_string())
    }
}
