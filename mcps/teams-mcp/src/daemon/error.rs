//! Error types for daemon HTTP calls
//!
//! Every failure of a daemon round trip collapses into [`DaemonError`], which
//! always carries the request path so callers can report it verbatim.

use thiserror::Error;

/// Maximum characters of a response body kept in an error
pub const BODY_EXCERPT_LIMIT: usize = 1000;

/// Errors that can occur when calling the orchestration daemon
#[derive(Error, Debug)]
pub enum DaemonError {
    /// The daemon could not be reached, or the request timed out
    #[error("daemon request to {path} failed: {reason}")]
    Transport {
        path: String,
        reason: String,
    },

    /// The daemon answered with a non-2xx status
    #[error("daemon returned HTTP {status} for {path}: {body}")]
    HttpStatus {
        path: String,
        status: u16,
        /// Response body, truncated to [`BODY_EXCERPT_LIMIT`] characters
        body: String,
    },

    /// The daemon answered 2xx with a body that is not JSON
    #[error("daemon returned malformed JSON for {path}: {excerpt}")]
    MalformedResponse {
        path: String,
        excerpt: String,
    },
}

impl DaemonError {
    pub fn path(&self) -> &str {
        match self {
            DaemonError::Transport { path, .. }
            | DaemonError::HttpStatus { path, .. }
            | DaemonError::MalformedResponse { path, .. } => path,
        }
    }

    /// HTTP status, when the daemon answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            DaemonError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;

/// A [`super::DaemonClient`] could not be constructed
#[derive(Error, Debug)]
pub enum ClientBuildError {
    #[error("invalid base URL \"{url}\": {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base URL \"{0}\" cannot carry a path")]
    NotABase(String),

    #[error("could not build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Truncate `text` to at most `limit` characters on a char boundary
pub fn excerpt(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
