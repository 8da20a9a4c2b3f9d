use serde::{Deserialize, Serialize};

/// Default session lifetime: 12 hours.
pub const SESSION_TTL_SECS: i64 = 43_200;

/// A client-held record asserting a user is authenticated.
///
/// Sessions are immutable: re-login, logout, and expiry always replace the
/// whole value, never patch individual fields. The `credential` is the
/// transport-level Basic token (base64 of `username:password`), so it is
/// kept out of `Debug` output.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub credential: String,
    pub issued_at: i64,
    pub ttl_secs: i64,
    pub is_admin: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("credential", &"[REDACTED]")
            .field("issued_at", &self.issued_at)
            .field("ttl_secs", &self.ttl_secs)
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

impl Session {
    pub fn new(
        username: impl Into<String>,
        credential: impl Into<String>,
        issued_at: i64,
        ttl_secs: i64,
        is_admin: bool,
    ) -> Self {
        Self {
            username: username.into(),
            credential: credential.into(),
            issued_at,
            ttl_secs,
            is_admin,
        }
    }

    /// Epoch second at which this session stops being valid.
    pub fn expires_at(&self) -> i64 {
        self.issued_at + self.ttl_secs
    }

    /// A session is expired once `now` reaches the expiry instant.
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at()
    }
}
