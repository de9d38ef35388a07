/// JWT Claims structure
///
/// The payload of an access token: issuer, subject, issued-at and
/// expiration (RFC 7519 registered claims only).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// JWT Claims for access tokens
///
/// Missing fields deserialize to empty/zero so a signed token that omits one
/// fails the matching issuer, subject or expiry check instead of decoding.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Issuer
    #[serde(default)]
    pub iss: String,
    /// Subject (user ID as UUID string)
    #[serde(default)]
    pub sub: String,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    #[serde(default)]
    pub exp: i64,
}

impl Claims {
    /// Create claims for `user_id`, valid for `ttl` from `now`.
    ///
    /// # Errors
    /// Returns `ExpiryOutOfRange` if `now + ttl` is not a representable date
    pub fn new(
        user_id: Uuid,
        issuer: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(AuthError::ExpiryOutOfRange)?;

        Ok(Self {
            iss: issuer.to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// Extract user ID from claims
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::SubjectMalformed)
    }

    /// A token is expired from the second `exp` is reached.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
