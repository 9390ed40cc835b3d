//! API error taxonomy.
//!
//! Every failure of a page request falls into one of three kinds. The core
//! treats them alike for phase recovery; only [`ErrorKind::Auth`] carries an
//! extra meaning (the session is probably no longer valid).

use thiserror::Error;

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network unreachable, timeout, non-success status.
    Transport,
    /// Token rejected or expired.
    Auth,
    /// Response body was not a valid page of posts.
    Decoding,
}

/// Errors from a timeline request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Request did not complete or the server answered with an error status.
    #[error("transport error: {0}")]
    Transport(String),

    /// Server rejected the access token.
    #[error("authorization rejected (HTTP {status})")]
    Auth {
        /// HTTP status code (401 or 403).
        status: u16,
    },

    /// Response could not be decoded.
    #[error("malformed response: {0}")]
    Decoding(String),
}

impl ApiError {
    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Auth { .. } => ErrorKind::Auth,
            Self::Decoding(_) => ErrorKind::Decoding,
        }
    }

    /// True when the session should be considered invalid.
    pub fn is_auth(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decoding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_auth_errors_invalidate() {
        assert!(ApiError::Auth { status: 401 }.is_auth());
        assert!(!ApiError::Transport("timeout".into()).is_auth());
        assert!(!ApiError::Decoding("eof".into()).is_auth());
    }

    #[test]
    fn kinds_match_variants() {
        assert_eq!(ApiError::Transport(String::new()).kind(), ErrorKind::Transport);
        assert_eq!(ApiError::Auth { status: 403 }.kind(), ErrorKind::Auth);
        assert_eq!(ApiError::Decoding(String::new()).kind(), ErrorKind::Decoding);
    }
}
