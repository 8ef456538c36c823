//! Error types for the pagination strategies.
//!
//! Pagination failures are fatal for the whole resolution call: the caller
//! must not persist a cursor computed from a page it could not fetch or
//! parse. Parse failures are explicit values here rather than panics so the
//! caller can propagate them as control flow.

use thiserror::Error;

/// Errors that can occur while walking upstream pagination.
#[derive(Debug, Error)]
pub enum PagerError {
    /// HTTP client construction failed.
    #[error("failed to construct pager HTTP client: {source}")]
    Client {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// Network-level error (DNS resolution, connection refused, timeout, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The page URL that failed to fetch.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The page URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Expected page markup was absent (page indicator, scroll container).
    #[error("parse error on {url}: {reason}")]
    Parse {
        /// The page URL whose body failed to parse.
        url: String,
        /// What marker was missing.
        reason: &'static str,
    },
}

impl PagerError {
    /// Creates a client construction error.
    pub fn client(source: reqwest::Error) -> Self {
        Self::Client { source }
    }

    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a parse error for a missing markup marker.
    pub fn parse(url: impl Into<String>, reason: &'static str) -> Self {
        Self::Parse {
            url: url.into(),
            reason,
        }
    }
}
