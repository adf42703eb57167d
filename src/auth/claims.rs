/// Session token claims (RFC 7519 subset)

use serde::{Deserialize, Serialize};

/// Claims carried by an access token. The subject is the username; tokens
/// hold no other identity state, so handlers must re-resolve the user.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Create claims for `subject` expiring `ttl_seconds` from now.
    pub fn new(subject: String, ttl_seconds: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: subject,
            exp: now + ttl_seconds,
            iat: now,
        }
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.exp < now
    }
}
