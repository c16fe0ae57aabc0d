//! Bearer credential representation and expiry logic.

use serde::{Deserialize, Serialize};
use std::{
    fmt,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// Seconds before `expires_at` at which a credential stops being handed out.
pub const SAFETY_MARGIN_SECS: u64 = 60;

/// Timestamps at or above this value are milliseconds, not seconds.
const MILLIS_THRESHOLD: u64 = 1_000_000_000_000;

/// A bearer token together with its absolute expiry (seconds since epoch).
///
/// Credentials are immutable: a refresh produces a new value that supersedes
/// the old one rather than updating it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedCredential {
    token: String,
    expires_at: u64,
}

impl CachedCredential {
    /// Create a credential expiring at `expires_at`.
    ///
    /// The upstream reports expiry in milliseconds; such values are
    /// normalised to seconds.
    pub fn new(token: impl Into<String>, expires_at: u64) -> Self {
        let expires_at = if expires_at >= MILLIS_THRESHOLD {
            expires_at / 1000
        } else {
            expires_at
        };
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Create a credential expiring `ttl_secs` seconds from now.
    pub fn with_ttl(token: impl Into<String>, ttl_secs: u64) -> Self {
        Self::new(token, now_secs() + ttl_secs)
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn expires_at(&self) -> u64 {
        self.expires_at
    }

    /// Return `true` while `now + 60 < expires_at`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(now_secs())
    }

    /// Validity check against an explicit clock reading.
    #[must_use]
    pub fn is_valid_at(&self, now: u64) -> bool {
        now + SAFETY_MARGIN_SECS < self.expires_at
    }

    /// Remaining lifetime, or zero if already past `expires_at`.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        Duration::from_secs(self.expires_at.saturating_sub(now_secs()))
    }
}

impl fmt::Debug for CachedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedCredential")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Current wall-clock time in whole seconds since the Unix epoch.
#[must_use]
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}
