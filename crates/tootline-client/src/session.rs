//! Authenticated session credentials.
//!
//! A [`Session`] binds one access token to one Mastodon instance. Sessions are
//! immutable once issued; a "different" session is any session that is not
//! equal, which is how the core decides whether to build a new timeline.

use std::{borrow::Cow, fmt};

use thiserror::Error;
use url::Url;

/// Errors produced while building or restoring a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Instance address is not an http(s) URL or bare host, or carries
    /// credentials, a query or a fragment.
    #[error("invalid instance address: {0:?}")]
    InvalidInstance(String),

    /// Access token is empty.
    #[error("access token is missing")]
    MissingToken,

    /// Session storage could not be read.
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// OAuth bearer token.
///
/// `Debug` output is redacted so sessions can be logged safely.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(String);

impl AccessToken {
    /// Raw token value, for the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Authenticated credential bound to one server account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Session {
    /// Always ends in `/`, so relative API paths join beneath it.
    instance: Url,
    access_token: AccessToken,
}

impl Session {
    /// Build a session for `instance` with the given access token.
    ///
    /// A bare host (`mastodon.social`) is treated as `https://mastodon.social`.
    /// Trailing slashes are normalized so equal servers compare equal.
    pub fn new(instance: &str, access_token: &str) -> Result<Self, SessionError> {
        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(SessionError::MissingToken);
        }

        Ok(Self {
            instance: parse_instance(instance)?,
            access_token: AccessToken(access_token.to_string()),
        })
    }

    /// Normalized instance base URL, e.g. `https://mastodon.social`.
    pub fn instance(&self) -> &str {
        self.instance.as_str().trim_end_matches('/')
    }

    /// URL of the API resource at `path`, relative to the instance base.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.instance.join(path.trim_start_matches('/'))
    }

    /// Access token for API requests.
    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }
}

fn parse_instance(raw: &str) -> Result<Url, SessionError> {
    let invalid = || SessionError::InvalidInstance(raw.to_string());

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }
    let candidate = if trimmed.contains("://") {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("https://{trimmed}"))
    };

    let mut url = Url::parse(&candidate).map_err(|_| invalid())?;
    let acceptable = matches!(url.scheme(), "http" | "https")
        && url.host_str().is_some_and(|host| !host.is_empty())
        && url.username().is_empty()
        && url.password().is_none()
        && url.query().is_none()
        && url.fragment().is_none();
    if !acceptable {
        return Err(invalid());
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
