/// JWT Token Generation and Validation
///
/// Access tokens are HS256-signed compact JWTs carrying `iss`, `sub`, `iat`
/// and `exp`. They are stateless: nothing is stored, and a token stays valid
/// until `exp` no matter what happens to the refresh token it came from.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;
use crate::error::AuthError;

/// Issue an access token for `user_id`, valid for `ttl` from now.
///
/// # Errors
/// - `ExpiryOutOfRange` if `ttl` pushes `exp` past the representable dates
/// - `TokenEncoding` if signing fails
pub fn issue_access_token(
    user_id: Uuid,
    ttl: Duration,
    config: &JwtSettings,
) -> Result<String, AuthError> {
    issue_access_token_at(user_id, ttl, config, Utc::now())
}

/// Same as [`issue_access_token`] with an explicit clock reading.
pub fn issue_access_token_at(
    user_id: Uuid,
    ttl: Duration,
    config: &JwtSettings,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let claims = Claims::new(user_id, &config.issuer, ttl, now)?;
    encode_claims(&claims, &config.secret)
}

fn encode_claims(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenEncoding(e.to_string()))
}

/// Validate an access token and return the user it was issued to.
///
/// # Errors
/// - `SignatureInvalid` if the token does not verify against the secret
///   (this includes tokens that are not well-formed JWTs at all)
/// - `IssuerInvalid` if `iss` is not the configured issuer
/// - `TokenExpired` once `exp` is reached
/// - `SubjectMalformed` if `sub` is not a UUID
pub fn validate_access_token(token: &str, config: &JwtSettings) -> Result<Uuid, AuthError> {
    validate_access_token_at(token, config, Utc::now())
}

/// Same as [`validate_access_token`] with an explicit clock reading.
pub fn validate_access_token_at(
    token: &str,
    config: &JwtSettings,
    now: DateTime<Utc>,
) -> Result<Uuid, AuthError> {
    let claims = decode_verified(token, &config.secret)?;

    if claims.iss != config.issuer {
        tracing::warn!(issuer = %claims.iss, "Access token has unexpected issuer");
        return Err(AuthError::IssuerInvalid);
    }

    if claims.is_expired_at(now) {
        tracing::debug!(exp = claims.exp, "Access token expired");
        return Err(AuthError::TokenExpired);
    }

    claims.user_id()
}

/// Verify the signature and decode the payload.
///
/// Time and issuer checks are switched off in `jsonwebtoken` so each one can
/// fail with its own error; the caller performs them.
fn decode_verified(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("JWT verification error: {}", e);
        AuthError::SignatureInvalid
    })
}
