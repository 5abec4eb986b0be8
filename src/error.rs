//! Error taxonomy for calls to the search API

use serde::Serialize;
use thiserror::Error;

/// Failure of a single autocomplete or search request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection refused, DNS failure, reset, ...
    #[error("network error: {0}")]
    Network(String),
    /// No response within the configured timeout
    #[error("request timed out")]
    Timeout,
    /// The API answered with a non-success status
    #[error("server returned HTTP {0}")]
    Status(u16),
    /// The body was not valid JSON
    #[error("malformed response body: {0}")]
    Malformed(String),
}

/// Data-only tag for a [`FetchError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    Network,
    Timeout,
    Status,
    Malformed,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Network(_) => FetchErrorKind::Network,
            Self::Timeout => FetchErrorKind::Timeout,
            Self::Status(_) => FetchErrorKind::Status,
            Self::Malformed(_) => FetchErrorKind::Malformed,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
