/// Persistence for users and refresh tokens.
///
/// Handlers only see the traits. `InMemoryStore` backs tests and
/// database-less runs; `PgStore` is the production backend.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::RefreshToken;
use crate::error::DatabaseError;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// A user account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, hashed_password: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            hashed_password,
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `UniqueConstraintViolation` if the email is taken.
    async fn create_user(&self, user: User) -> Result<User, DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    /// Replace email and password hash. Fails with `NotFound` for an unknown id.
    async fn update_credentials(
        &self,
        user_id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, DatabaseError>;
}

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Fails with `UniqueConstraintViolation` if the token string exists.
    async fn save_refresh_token(&self, row: &RefreshToken) -> Result<(), DatabaseError>;

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, DatabaseError>;

    /// Persist the revocation carried by `row`. A row that is already revoked
    /// in the store keeps its original `revoked_at`.
    async fn mark_revoked(&self, row: &RefreshToken) -> Result<(), DatabaseError>;
}
