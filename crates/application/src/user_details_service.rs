//! Adapts the user repository into the lookup contract used by
//! authentication providers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use warden_core::{AppError, AppResult, AuthenticatedUser, AuthenticationError};

use crate::{UserRecord, UserRepository};

/// Message carried by the not-found signal.
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";

/// Core user information consumed by authentication providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetails {
    username: String,
    password_hash: String,
    display_name: String,
    authorities: Vec<String>,
    enabled: bool,
    account_non_locked: bool,
}

impl UserDetails {
    /// Returns the login username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the stored password hash.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        self.password_hash.as_str()
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the granted authorities.
    #[must_use]
    pub fn authorities(&self) -> &[String] {
        self.authorities.as_slice()
    }

    /// Returns whether the account is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns whether the account is not locked.
    #[must_use]
    pub fn is_account_non_locked(&self) -> bool {
        self.account_non_locked
    }

    /// Returns a copy with a replaced password hash.
    #[must_use]
    pub fn with_password_hash(mut self, password_hash: impl Into<String>) -> Self {
        self.password_hash = password_hash.into();
        self
    }

    /// Builds the credential-free principal for this user.
    #[must_use]
    pub fn to_authenticated_user(&self) -> AuthenticatedUser {
        AuthenticatedUser::new(
            self.username.clone(),
            self.display_name.clone(),
            self.authorities.clone(),
        )
    }
}

impl From<UserRecord> for UserDetails {
    fn from(record: UserRecord) -> Self {
        Self {
            username: record.email,
            password_hash: record.password_hash,
            display_name: record.full_name,
            authorities: Vec::new(),
            enabled: record.enabled,
            account_non_locked: !record.locked,
        }
    }
}

/// Loads user details by username.
#[async_trait]
pub trait UserDetailsService: Send + Sync {
    /// Returns the user for `username`, or `UsernameNotFound`.
    async fn load_user_by_username(&self, username: &str)
    -> Result<UserDetails, AuthenticationError>;
}

/// Persists re-encoded passwords after a successful authentication.
#[async_trait]
pub trait UserDetailsPasswordService: Send + Sync {
    /// Stores `new_password_hash` for `user` and returns the updated details.
    async fn update_password(
        &self,
        user: UserDetails,
        new_password_hash: &str,
    ) -> AppResult<UserDetails>;
}

/// User lookup backed by a [`UserRepository`], keyed by email.
#[derive(Clone)]
pub struct RepositoryUserDetailsService {
    user_repository: Arc<dyn UserRepository>,
}

impl RepositoryUserDetailsService {
    /// Creates a lookup service over the given repository.
    #[must_use]
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }
}

#[async_trait]
impl UserDetailsService for RepositoryUserDetailsService {
    async fn load_user_by_username(
        &self,
        username: &str,
    ) -> Result<UserDetails, AuthenticationError> {
        let record = self
            .user_repository
            .find_by_email(username)
            .await
            .map_err(|error| AuthenticationError::Service(error.to_string()))?;

        match record {
            Some(record) => Ok(UserDetails::from(record)),
            None => {
                debug!(username, "no user record for username");
                Err(AuthenticationError::UsernameNotFound(
                    USER_NOT_FOUND_MESSAGE.to_owned(),
                ))
            }
        }
    }
}

#[async_trait]
impl UserDetailsPasswordService for RepositoryUserDetailsService {
    async fn update_password(
        &self,
        user: UserDetails,
        new_password_hash: &str,
    ) -> AppResult<UserDetails> {
        if new_password_hash.is_empty() {
            return Err(AppError::Validation(
                "new password hash must not be empty".to_owned(),
            ));
        }

        self.user_repository
            .update_password(user.username(), new_password_hash)
            .await?;

        Ok(user.with_password_hash(new_password_hash))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use warden_core::AuthenticationError;

    use crate::test_support::{FakeUserRepository, sample_user};

    use super::*;

    #[tokio::test]
    async fn known_email_returns_matching_details() {
        let repository = Arc::new(FakeUserRepository::with_users(vec![sample_user(
            "ada@example.com",
            "plain:correct horse",
        )]));
        let service = RepositoryUserDetailsService::new(repository.clone());

        let details = service.load_user_by_username("ada@example.com").await;

        let details = details.unwrap_or_else(|error| panic!("unexpected error: {error}"));
        assert_eq!(details.username(), "ada@example.com");
        assert_eq!(details.password_hash(), "plain:correct horse");
        assert_eq!(details.display_name(), "Test User");
        assert!(details.is_enabled());
        assert!(details.is_account_non_locked());
        assert!(details.authorities().is_empty());
    }

    #[tokio::test]
    async fn lookup_forwards_username_unchanged() {
        let repository = Arc::new(FakeUserRepository::default());
        let service = RepositoryUserDetailsService::new(repository.clone());

        let _ = service.load_user_by_username(" Grace@Example.com ").await;

        assert_eq!(repository.lookups(), vec![" Grace@Example.com ".to_owned()]);
    }

    #[tokio::test]
    async fn unknown_email_fails_with_not_found() {
        let service = RepositoryUserDetailsService::new(Arc::new(FakeUserRepository::default()));

        let result = service.load_user_by_username("nobody@example.com").await;

        assert_eq!(
            result,
            Err(AuthenticationError::UsernameNotFound(
                "User not found".to_owned()
            ))
        );
    }

    #[tokio::test]
    async fn repository_failure_is_a_service_error() {
        let repository = Arc::new(FakeUserRepository::default());
        repository.fail_lookups();
        let service = RepositoryUserDetailsService::new(repository);

        let result = service.load_user_by_username("ada@example.com").await;

        assert!(matches!(result, Err(AuthenticationError::Service(_))));
    }

    #[tokio::test]
    async fn update_password_persists_and_returns_new_hash() {
        let repository = Arc::new(FakeUserRepository::with_users(vec![sample_user(
            "ada@example.com",
            "legacy:old",
        )]));
        let service = RepositoryUserDetailsService::new(repository.clone());
        let details = service
            .load_user_by_username("ada@example.com")
            .await
            .unwrap_or_else(|error| panic!("unexpected error: {error}"));

        let updated = service
            .update_password(details, "plain:new")
            .await
            .unwrap_or_else(|error| panic!("unexpected error: {error}"));

        assert_eq!(updated.password_hash(), "plain:new");
        assert_eq!(
            repository.stored_hash("ada@example.com").as_deref(),
            Some("plain:new")
        );
    }
}
