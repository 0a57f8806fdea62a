//! Error types for provider calls.
//!
//! These never escape the pool or single-query paths: every variant is
//! logged, counted and turned into "no data" for the failing call.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewsError {
    /// HTTP request failed before a response arrived
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Provider answered with a non-2xx status
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Response body was not the expected JSON shape
    #[error("parse error: {0}")]
    ParseError(String),

    /// Call exceeded the per-request timeout
    #[error("timed out after {0} ms")]
    Timeout(u64),
}

impl From<reqwest::Error> for NewsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            NewsError::ParseError(e.to_string())
        } else {
            NewsError::RequestFailed(e.to_string())
        }
    }
}
