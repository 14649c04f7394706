//! Error types for API calls.

use prefhub_core::CardFormatError;
use thiserror::Error;

/// Result type alias using [`ClientError`].
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failure of a single API call. Nothing is retried.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the login.
    #[error("Login rejected for '{username}': {status} - {body}")]
    Auth {
        /// Username that attempted to log in.
        username: String,
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// An authenticated call returned a non-2xx status.
    #[error("{status} - {body} ({endpoint})")]
    Http {
        /// Endpoint path that was called.
        endpoint: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// A card token could not be parsed; no request was sent.
    #[error(transparent)]
    CardFormat(#[from] CardFormatError),

    /// The request could not be sent or the response could not be read.
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        /// Endpoint path that was called.
        endpoint: &'static str,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// A successful response did not contain the expected JSON.
    #[error("Unexpected response from {endpoint}: {source}")]
    Decode {
        /// Endpoint path that was called.
        endpoint: &'static str,
        /// JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// HTTP status of the failed call, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            Self::CardFormat(_) | Self::Decode { .. } => None,
        }
    }
}
