use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{RefreshTokenStore, User, UserStore};
use crate::auth::RefreshToken;
use crate::error::DatabaseError;

/// Process-local store. State is lost on restart.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    refresh_tokens: RwLock<HashMap<String, RefreshToken>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> DatabaseError {
    DatabaseError::UnexpectedError("store lock poisoned".to_string())
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, user: User) -> Result<User, DatabaseError> {
        let mut users = self.users.write().map_err(poisoned)?;
        if users.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "email already registered".to_string(),
            ));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update_credentials(
        &self,
        user_id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, DatabaseError> {
        let mut users = self.users.write().map_err(poisoned)?;
        if users.values().any(|u| u.email == email && u.id != user_id) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "email already registered".to_string(),
            ));
        }

        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| DatabaseError::NotFound("user".to_string()))?;
        user.email = email.to_string();
        user.hashed_password = hashed_password.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryStore {
    async fn save_refresh_token(&self, row: &RefreshToken) -> Result<(), DatabaseError> {
        let mut tokens = self.refresh_tokens.write().map_err(poisoned)?;
        if tokens.contains_key(&row.token) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "refresh token already exists".to_string(),
            ));
        }
        tokens.insert(row.token.clone(), row.clone());
        Ok(())
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, DatabaseError> {
        let tokens = self.refresh_tokens.read().map_err(poisoned)?;
        Ok(tokens.get(token).cloned())
    }

    async fn mark_revoked(&self, row: &RefreshToken) -> Result<(), DatabaseError> {
        let Some(revoked_at) = row.revoked_at else {
            return Ok(());
        };

        let mut tokens = self.refresh_tokens.write().map_err(poisoned)?;
        let stored = tokens
            .get_mut(&row.token)
            .ok_or_else(|| DatabaseError::NotFound("refresh token".to_string()))?;
        stored.revoke_at(revoked_at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{issue_refresh_token, revoke_refresh_token};
    use chrono::Duration;

    #[tokio::test]
    async fn test_create_and_find_user() {
        let store = InMemoryStore::new();
        let user = User::new("walt@breakingbad.com".to_string(), "hash".to_string());

        store.create_user(user.clone()).await.unwrap();

        let found = store.find_user_by_email("walt@breakingbad.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(store.find_user_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = InMemoryStore::new();
        store
            .create_user(User::new("a@example.com".to_string(), "h1".to_string()))
            .await
            .unwrap();

        let result = store
            .create_user(User::new("a@example.com".to_string(), "h2".to_string()))
            .await;
        assert!(matches!(result, Err(DatabaseError::UniqueConstraintViolation(_))));
    }

    #[tokio::test]
    async fn test_update_credentials() {
        let store = InMemoryStore::new();
        let user = store
            .create_user(User::new("a@example.com".to_string(), "old".to_string()))
            .await
            .unwrap();

        let updated = store
            .update_credentials(user.id, "b@example.com", "new")
            .await
            .unwrap();
        assert_eq!(updated.email, "b@example.com");
        assert_eq!(updated.hashed_password, "new");

        let missing = store.update_credentials(Uuid::new_v4(), "c@example.com", "x").await;
        assert!(matches!(missing, Err(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_refresh_token_round_trip_and_revoke() {
        let store = InMemoryStore::new();
        let row = issue_refresh_token(Uuid::new_v4(), Duration::days(60)).unwrap();
        store.save_refresh_token(&row).await.unwrap();

        let found = store.find_refresh_token(&row.token).await.unwrap();
        assert_eq!(found.as_ref(), Some(&row));

        let revoked = revoke_refresh_token(row.clone());
        store.mark_revoked(&revoked).await.unwrap();
        let stored = store.find_refresh_token(&row.token).await.unwrap().unwrap();
        assert_eq!(stored.revoked_at, revoked.revoked_at);

        // A later revocation does not move the timestamp
        let mut later = revoked.clone();
        later.revoked_at = Some(Utc::now() + Duration::hours(1));
        store.mark_revoked(&later).await.unwrap();
        let stored = store.find_refresh_token(&row.token).await.unwrap().unwrap();
        assert_eq!(stored.revoked_at, revoked.revoked_at);
    }

    #[tokio::test]
    async fn test_duplicate_refresh_token_is_rejected() {
        let store = InMemoryStore::new();
        let row = issue_refresh_token(Uuid::new_v4(), Duration::days(60)).unwrap();
        store.save_refresh_token(&row).await.unwrap();

        let result = store.save_refresh_token(&row).await;
        assert!(matches!(result, Err(DatabaseError::UniqueConstraintViolation(_))));
    }
}
