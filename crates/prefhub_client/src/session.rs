//! Session credentials.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of token characters shown in logs.
const PREVIEW_LEN: usize = 20;

/// Opaque bearer token issued by the server.
///
/// `Debug` only shows a short prefix so tokens do not end up in logs whole.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token, for the `Authorization` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First few characters of the token, for logging.
    #[must_use]
    pub fn preview(&self) -> &str {
        match self.0.char_indices().nth(PREVIEW_LEN) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken({}...)", self.preview())
    }
}

impl From<&str> for SessionToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for SessionToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// A bearer token together with the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token.
    pub token: SessionToken,
    /// Owning username.
    pub username: String,
}

impl Session {
    /// Create a session.
    pub fn new(token: impl Into<SessionToken>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
        }
    }
}
