use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use warden_application::{NewUserRecord, UserRecord, UserRepository};
use warden_core::{AppError, AppResult};
use warden_domain::UserId;

/// In-memory user repository keyed by lower-cased email.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Sets the `enabled` and `locked` flags for an existing user.
    pub async fn set_account_status(
        &self,
        email: &str,
        enabled: bool,
        locked: bool,
    ) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&email.to_lowercase())
            .ok_or_else(|| AppError::NotFound(format!("user '{email}' does not exist")))?;

        user.enabled = enabled;
        user.locked = locked;
        user.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.get(&email.to_lowercase()).cloned())
    }

    async fn create(&self, user: NewUserRecord) -> AppResult<UserId> {
        let key = user.email.as_str().to_lowercase();
        let mut users = self.users.write().await;

        if users.contains_key(&key) {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let now = Utc::now();
        let user_id = UserId::new();
        users.insert(
            key.clone(),
            UserRecord {
                id: user_id,
                full_name: user.full_name,
                email: key,
                password_hash: user.password_hash,
                enabled: true,
                locked: false,
                created_at: now,
                updated_at: now,
            },
        );

        Ok(user_id)
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&email.to_lowercase())
            .ok_or_else(|| AppError::NotFound(format!("user '{email}' does not exist")))?;

        user.password_hash = password_hash.to_owned();
        user.updated_at = Utc::now();
        Ok(())
    }
}
