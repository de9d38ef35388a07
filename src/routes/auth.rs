/// Authentication Routes
///
/// Login, access token refresh and refresh token revocation.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{
    bearer_token, issue_access_token, issue_refresh_token, revoke_refresh_token,
    validate_refresh_token, verify_credentials,
};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};
use crate::store::{RefreshTokenStore, User, UserStore};

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: the user plus a fresh token pair
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

/// Access token minted from a refresh token
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/login
///
/// Verifies email and password, then issues an access token and a refresh
/// token. The refresh token row is persisted before responding.
///
/// # Errors
/// - 401: Unknown email or wrong password (same response for both)
/// - 500: Hashing, signing or store failure
pub async fn login(
    form: web::Json<LoginRequest>,
    users: web::Data<dyn UserStore>,
    refresh_tokens: web::Data<dyn RefreshTokenStore>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let email = form.email.trim().to_lowercase();
    let user = users.find_user_by_email(&email).await?;

    verify_credentials(&form.password, user.as_ref().map(|u| u.hashed_password.as_str()))?;
    let user = user.ok_or(AuthError::CredentialMismatch)?;

    let token = issue_access_token(user.id, jwt_config.access_token_ttl()?, jwt_config.get_ref())?;
    let refresh_token = issue_refresh_token(user.id, jwt_config.refresh_token_ttl()?)?;
    refresh_tokens.save_refresh_token(&refresh_token).await?;

    tracing::info!(user_id = %user.id, "User logged in successfully");

    Ok(HttpResponse::Ok().json(LoginResponse {
        user,
        token,
        refresh_token: refresh_token.token,
    }))
}

/// POST /api/refresh
///
/// Takes a refresh token as the bearer credential and returns a new access
/// token. The refresh token itself is left untouched.
///
/// # Errors
/// - 401: Missing header, unknown, revoked or expired refresh token
pub async fn refresh(
    req: HttpRequest,
    refresh_tokens: web::Data<dyn RefreshTokenStore>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let presented = bearer_token(req.headers())?;
    let row = refresh_tokens.find_refresh_token(&presented).await?;
    let user_id = validate_refresh_token(row.as_ref())?;

    let token = issue_access_token(user_id, jwt_config.access_token_ttl()?, jwt_config.get_ref())?;

    tracing::info!(user_id = %user_id, "Access token refreshed");

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// POST /api/revoke
///
/// Revokes the refresh token presented as the bearer credential. Revoking an
/// already revoked token succeeds without changing it. Access tokens already
/// minted from it stay valid until they expire.
///
/// # Errors
/// - 401: Missing header or unknown refresh token
pub async fn revoke(
    req: HttpRequest,
    refresh_tokens: web::Data<dyn RefreshTokenStore>,
) -> Result<HttpResponse, AppError> {
    let presented = bearer_token(req.headers())?;
    let row = refresh_tokens
        .find_refresh_token(&presented)
        .await?
        .ok_or(AuthError::RefreshNotFound)?;

    let revoked = revoke_refresh_token(row);
    refresh_tokens.mark_revoked(&revoked).await?;

    Ok(HttpResponse::NoContent().finish())
}
