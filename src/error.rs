/// Application Error Handling
///
/// One enum per concern, unified under `AppError`:
/// 1. Authentication errors (token and credential failures)
/// 2. Validation errors for request input
/// 3. Database / store errors
///
/// `ConfigError` stands apart: it only occurs at startup, before any request
/// is served, so it never becomes an HTTP response.
///
/// `AppError` implements `ResponseError` so handlers can return it directly.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

/// ============================================================================
/// 1. DOMAIN-SPECIFIC ERROR TYPES
/// ============================================================================

/// Token and credential failures.
///
/// Every rejection variant is terminal: the caller must obtain a new token or
/// credential instead of retrying with the same input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Password did not verify. Never says why.
    CredentialMismatch,
    SignatureInvalid,
    IssuerInvalid,
    TokenExpired,
    SubjectMalformed,
    RefreshNotFound,
    RefreshRevoked,
    RefreshExpired,
    HeaderMissing,
    HeaderMalformed,
    /// bcrypt could not produce a hash (entropy or resource failure).
    HashingFailed(String),
    /// The access token could not be signed.
    TokenEncoding(String),
    /// `now + ttl` falls outside the representable date range.
    ExpiryOutOfRange,
}

impl AuthError {
    /// True for failures caused by the presented credential, as opposed to
    /// infrastructure failures on our side.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            AuthError::HashingFailed(_) | AuthError::TokenEncoding(_) | AuthError::ExpiryOutOfRange
        )
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::CredentialMismatch => write!(f, "Credential mismatch"),
            AuthError::SignatureInvalid => write!(f, "Token signature is invalid"),
            AuthError::IssuerInvalid => write!(f, "Token issuer is invalid"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::SubjectMalformed => write!(f, "Token subject is malformed"),
            AuthError::RefreshNotFound => write!(f, "Refresh token not found"),
            AuthError::RefreshRevoked => write!(f, "Refresh token has been revoked"),
            AuthError::RefreshExpired => write!(f, "Refresh token has expired"),
            AuthError::HeaderMissing => write!(f, "Missing authorization header"),
            AuthError::HeaderMalformed => write!(f, "Malformed authorization header"),
            AuthError::HashingFailed(msg) => write!(f, "Password hashing failed: {}", msg),
            AuthError::TokenEncoding(msg) => write!(f, "Token generation failed: {}", msg),
            AuthError::ExpiryOutOfRange => write!(f, "Token lifetime is out of range"),
        }
    }
}

impl StdError for AuthError {}

/// Validation errors for input data
#[derive(Debug, Clone)]
pub enum ValidationError {
    EmptyField(&'static str),
    TooShort(&'static str, usize),
    TooLong(&'static str, usize),
    InvalidFormat(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is empty", field),
            ValidationError::TooShort(field, min) => {
                write!(f, "{} is too short (minimum {} characters)", field, min)
            }
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} characters)", field, max)
            }
            ValidationError::InvalidFormat(field) => write!(f, "{} has invalid format", field),
        }
    }
}

impl StdError for ValidationError {}

/// Store operation errors
#[derive(Debug)]
pub enum DatabaseError {
    UniqueConstraintViolation(String),
    NotFound(String),
    ConnectionPool(String),
    UnexpectedError(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::UniqueConstraintViolation(msg) => {
                write!(f, "Duplicate entry: {}", msg)
            }
            DatabaseError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DatabaseError::ConnectionPool(msg) => write!(f, "Database connection error: {}", msg),
            DatabaseError::UnexpectedError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl StdError for DatabaseError {}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    /// Sources could not be read or did not deserialize into `Settings`.
    Load(String),
    MissingRequired(String),
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Load(msg) => write!(f, "Failed to load config: {}", msg),
            ConfigError::MissingRequired(msg) => write!(f, "Missing required config: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config value: {}", msg),
        }
    }
}

impl StdError for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Load(err.to_string())
    }
}

/// ============================================================================
/// 2. UNIFIED APPLICATION ERROR TYPE
/// ============================================================================

#[derive(Debug)]
pub enum AppError {
    Auth(AuthError),
    Validation(ValidationError),
    Database(DatabaseError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Database(e) => write!(f, "{}", e),
        }
    }
}

impl StdError for AppError {}

// ============================================================================
// FROM IMPLEMENTATIONS
// ============================================================================

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Database(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(DatabaseError::from(err))
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                DatabaseError::UniqueConstraintViolation(db.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::ConnectionPool(err.to_string())
            }
            _ => DatabaseError::UnexpectedError(err.to_string()),
        }
    }
}

// ============================================================================
// 3. HTTP RESPONSE MAPPING
// ============================================================================

/// Error response structure for HTTP responses
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Human-readable error message
    pub message: String,
    /// Error code for client-side handling
    pub code: String,
    pub status: u16,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, message: String, code: String, status: u16) -> Self {
        Self {
            error_id,
            message,
            code,
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl AppError {
    /// Status, client code and client-facing message.
    ///
    /// Auth rejections share a small set of generic messages so a response
    /// never tells the caller whether an account exists.
    fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Auth(e) => match e {
                AuthError::CredentialMismatch => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    "Incorrect email or password".to_string(),
                ),
                AuthError::HeaderMissing | AuthError::HeaderMalformed => (
                    StatusCode::UNAUTHORIZED,
                    "MISSING_TOKEN",
                    "Missing or invalid authorization header".to_string(),
                ),
                AuthError::HashingFailed(_)
                | AuthError::TokenEncoding(_)
                | AuthError::ExpiryOutOfRange => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                ),
                _ => (
                    StatusCode::UNAUTHORIZED,
                    "TOKEN_INVALID",
                    "Invalid or expired token".to_string(),
                ),
            },
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
            AppError::Database(e) => match e {
                DatabaseError::UniqueConstraintViolation(_) => (
                    StatusCode::CONFLICT,
                    "DUPLICATE_ENTRY",
                    "Resource already exists".to_string(),
                ),
                DatabaseError::NotFound(_) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "Resource not found".to_string(),
                ),
                DatabaseError::ConnectionPool(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Database service temporarily unavailable".to_string(),
                ),
                DatabaseError::UnexpectedError(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error occurred".to_string(),
                ),
            },
        }
    }

    fn log_error(&self, request_id: &str) {
        match self {
            AppError::Auth(e) if e.is_rejection() => {
                tracing::warn!(request_id = request_id, error = %e, "Authentication rejected");
            }
            AppError::Validation(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Validation error");
            }
            AppError::Database(DatabaseError::UniqueConstraintViolation(_)) => {
                tracing::warn!(request_id = request_id, error = %self, "Duplicate entry attempt");
            }
            _ => {
                tracing::error!(request_id = request_id, error = %self, "Request failed");
            }
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let request_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&request_id);

        let (status, code, message) = self.classify();
        let body = ErrorResponse::new(request_id, message, code.to_string(), status.as_u16());

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        self.classify().0
    }
}
