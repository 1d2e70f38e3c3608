use common::RedactedSecret;
use models::SessionGrant;

/// Session token held by a client between authentication and disconnect.
///
/// The value never appears in `Debug` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    value: RedactedSecret,
    expires_at: Option<u64>,
}

impl SessionToken {
    /// Wrap a token obtained elsewhere; expiry unknown.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: RedactedSecret::new(value),
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at_ms: u64) -> Self {
        self.expires_at = Some(expires_at_ms);
        self
    }

    pub fn expose(&self) -> &str {
        self.value.expose()
    }

    /// Server-reported expiry in milliseconds since the Unix epoch.
    pub fn expires_at(&self) -> Option<u64> {
        self.expires_at
    }

    /// Informational only; the client never refreshes or rejects a token itself.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        self.expires_at.is_some_and(|expiry| now_ms >= expiry)
    }
}

impl From<SessionGrant> for SessionToken {
    fn from(grant: SessionGrant) -> Self {
        SessionToken::new(grant.session_token).with_expiry(grant.expires_at)
    }
}

impl From<String> for SessionToken {
    fn from(value: String) -> Self {
        SessionToken::new(value)
    }
}

impl From<&str> for SessionToken {
    fn from(value: &str) -> Self {
        SessionToken::new(value)
    }
}
