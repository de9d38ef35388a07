/// Refresh Token Management
///
/// Refresh tokens are:
/// - Cryptographically secure random 64-character strings
/// - Stored server-side as one row per token, keyed by the token itself
/// - Revoked by stamping `revoked_at`; rows are never deleted
///
/// Everything here is pure logic over a row. Fetching and persisting rows is
/// the job of a [`RefreshTokenStore`](crate::store::RefreshTokenStore).

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

const REFRESH_TOKEN_LENGTH: usize = 64;

/// A persisted refresh token row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    #[inline]
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Owner of the token if it is neither revoked nor expired.
    ///
    /// Revocation is checked first, so a revoked row reports `RefreshRevoked`
    /// whether or not it has also expired.
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<Uuid, AuthError> {
        if self.is_revoked() {
            tracing::warn!(user_id = %self.user_id, "Attempt to use revoked refresh token");
            return Err(AuthError::RefreshRevoked);
        }

        if self.is_expired_at(now) {
            tracing::info!(user_id = %self.user_id, "Refresh token expired");
            return Err(AuthError::RefreshExpired);
        }

        Ok(self.user_id)
    }

    /// Mark the row revoked at `now`. A second call changes nothing.
    pub fn revoke_at(&mut self, now: DateTime<Utc>) {
        if self.revoked_at.is_none() {
            self.revoked_at = Some(now);
            self.updated_at = now;
        }
    }
}

/// Generate a new cryptographically secure refresh token
///
/// 64 characters drawn from `[A-Za-z0-9]` (about 381 bits). Uniqueness is
/// enforced by the store's primary key, not checked here.
pub fn generate_refresh_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(REFRESH_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Build a fresh, unrevoked row for `user_id` that expires after `ttl`.
///
/// # Errors
/// Returns `ExpiryOutOfRange` if `now + ttl` is not a representable date
pub fn issue_refresh_token(user_id: Uuid, ttl: Duration) -> Result<RefreshToken, AuthError> {
    issue_refresh_token_at(user_id, ttl, Utc::now())
}

pub fn issue_refresh_token_at(
    user_id: Uuid,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<RefreshToken, AuthError> {
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or(AuthError::ExpiryOutOfRange)?;

    Ok(RefreshToken {
        token: generate_refresh_token(),
        user_id,
        created_at: now,
        updated_at: now,
        expires_at,
        revoked_at: None,
    })
}

/// Validate a row fetched by token string.
///
/// # Errors
/// - `RefreshNotFound` if the store had no row
/// - `RefreshRevoked` if the row has been revoked
/// - `RefreshExpired` if `expires_at` has been reached
pub fn validate_refresh_token(row: Option<&RefreshToken>) -> Result<Uuid, AuthError> {
    validate_refresh_token_at(row, Utc::now())
}

pub fn validate_refresh_token_at(
    row: Option<&RefreshToken>,
    now: DateTime<Utc>,
) -> Result<Uuid, AuthError> {
    match row {
        None => {
            tracing::warn!("Refresh token not found");
            Err(AuthError::RefreshNotFound)
        }
        Some(row) => row.validate_at(now),
    }
}

/// Revoke a row, returning the updated row. Idempotent.
pub fn revoke_refresh_token(mut row: RefreshToken) -> RefreshToken {
    row.revoke_at(Utc::now());
    row
}
