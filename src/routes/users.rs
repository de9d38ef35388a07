/// User account routes
///
/// Account creation and credential changes. Passwords are hashed here and
/// only the hash is handed to the store.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::auth::hash_password;
use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::store::{User, UserStore};
use crate::validators::{is_valid_email, is_valid_password};

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/users
///
/// # Errors
/// - 400: Invalid email or password
/// - 409: Email already registered
pub async fn create_user(
    form: web::Json<CredentialsRequest>,
    users: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    let email = is_valid_email(&form.email)?;
    let password = is_valid_password(&form.password)?;
    let hashed_password = hash_password(password)?;

    let user = users.create_user(User::new(email, hashed_password)).await?;

    tracing::info!(user_id = %user.id, "User created");

    Ok(HttpResponse::Created().json(user))
}

/// PUT /api/users
///
/// Replaces the caller's email and password. **Requires a valid access
/// token**; the user is taken from the token, never from the body.
///
/// # Errors
/// - 400: Invalid email or password
/// - 401: Missing or invalid access token (handled by middleware)
/// - 409: Email belongs to another account
pub async fn update_user(
    caller: web::ReqData<AuthenticatedUser>,
    form: web::Json<CredentialsRequest>,
    users: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    let email = is_valid_email(&form.email)?;
    let password = is_valid_password(&form.password)?;
    let hashed_password = hash_password(password)?;

    let user = users
        .update_credentials(caller.user_id, &email, &hashed_password)
        .await?;

    tracing::info!(user_id = %user.id, "User credentials updated");

    Ok(HttpResponse::Ok().json(user))
}
