//! Auth platform errors.

use thiserror::Error;

/// Errors that can occur when talking to the hosted auth platform.
#[derive(Debug, Error)]
pub enum AuthError {
    /// HTTP request failed before a response arrived.
    #[error("auth platform request failed: {0}")]
    Request(String),

    /// The platform did not answer within the request timeout.
    #[error("auth platform timed out")]
    Timeout,

    /// The presented bearer token is missing, invalid, or expired.
    #[error("invalid or expired access token")]
    InvalidToken,

    /// The platform rejected the request (bad input, duplicate email, ...).
    /// Carries the platform's own message, which is safe to show to the
    /// caller whose input caused it.
    #[error("{0}")]
    Rejected(String),

    /// The platform answered with something we could not interpret.
    #[error("unexpected auth platform response: {0}")]
    Response(String),
}

impl AuthError {
    /// Map a transport-level reqwest error.
    pub(super) fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err.to_string())
        }
    }
}
