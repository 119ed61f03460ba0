//! Username/password authentication against a user store.
//!
//! Looks the user up through a [`UserDetailsService`], checks account status,
//! then compares the presented password with the stored hash through the
//! configured [`PasswordEncoder`]. Unknown users and wrong passwords produce
//! the same generic error and take comparable time.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::{debug, warn};

use warden_core::{AuthenticatedUser, AuthenticationError, AuthenticationRequest};

use crate::{PasswordEncoder, UserDetails, UserDetailsPasswordService, UserDetailsService};

/// Raw password encoded once and compared against when a user is missing.
const USER_NOT_FOUND_PASSWORD: &str = "userNotFoundPassword";

/// Authenticates a single kind of request.
#[async_trait]
pub trait AuthenticationProvider: Send + Sync {
    /// Returns `Ok(None)` when this provider does not handle the request.
    async fn authenticate(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<Option<AuthenticatedUser>, AuthenticationError>;
}

/// Provider that retrieves users from a [`UserDetailsService`].
pub struct DaoAuthenticationProvider {
    user_details_service: Arc<dyn UserDetailsService>,
    password_encoder: Arc<dyn PasswordEncoder>,
    password_service: Option<Arc<dyn UserDetailsPasswordService>>,
    hide_user_not_found: bool,
    user_not_found_hash: OnceLock<Option<String>>,
}

impl DaoAuthenticationProvider {
    /// Creates a provider over a user lookup and a password encoder.
    #[must_use]
    pub fn new(
        user_details_service: Arc<dyn UserDetailsService>,
        password_encoder: Arc<dyn PasswordEncoder>,
    ) -> Self {
        Self {
            user_details_service,
            password_encoder,
            password_service: None,
            hide_user_not_found: true,
            user_not_found_hash: OnceLock::new(),
        }
    }

    /// Enables re-encoding of outdated hashes after successful logins.
    #[must_use]
    pub fn with_password_service(
        mut self,
        password_service: Arc<dyn UserDetailsPasswordService>,
    ) -> Self {
        self.password_service = Some(password_service);
        self
    }

    /// When `false`, unknown users surface as `UsernameNotFound` instead of
    /// `BadCredentials`.
    #[must_use]
    pub fn with_hide_user_not_found(mut self, hide_user_not_found: bool) -> Self {
        self.hide_user_not_found = hide_user_not_found;
        self
    }

    fn mitigate_against_timing_attack(&self, presented_password: Option<&str>) {
        let Some(presented_password) = presented_password else {
            return;
        };

        let dummy_hash = self
            .user_not_found_hash
            .get_or_init(|| self.password_encoder.encode(USER_NOT_FOUND_PASSWORD).ok());

        if let Some(dummy_hash) = dummy_hash {
            let _ = self.password_encoder.matches(presented_password, dummy_hash);
        }
    }

    async fn retrieve_user(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<UserDetails, AuthenticationError> {
        match self
            .user_details_service
            .load_user_by_username(request.username())
            .await
        {
            Ok(user) => Ok(user),
            Err(AuthenticationError::UsernameNotFound(message)) => {
                self.mitigate_against_timing_attack(request.password());
                debug!(username = request.username(), "authentication failed: user not found");

                if self.hide_user_not_found {
                    Err(AuthenticationError::bad_credentials())
                } else {
                    Err(AuthenticationError::UsernameNotFound(message))
                }
            }
            Err(error) => Err(error),
        }
    }

    fn check_credentials<'a>(
        &self,
        user: &UserDetails,
        request: &'a AuthenticationRequest,
    ) -> Result<&'a str, AuthenticationError> {
        let Some(presented_password) = request.password() else {
            debug!(username = user.username(), "authentication failed: no credentials provided");
            return Err(AuthenticationError::bad_credentials());
        };

        let matches = self
            .password_encoder
            .matches(presented_password, user.password_hash())
            .map_err(|error| AuthenticationError::Service(error.to_string()))?;

        if !matches {
            debug!(username = user.username(), "authentication failed: password does not match");
            return Err(AuthenticationError::bad_credentials());
        }

        Ok(presented_password)
    }

    async fn upgrade_encoding_if_needed(
        &self,
        user: UserDetails,
        presented_password: &str,
    ) -> UserDetails {
        let Some(password_service) = self.password_service.as_ref() else {
            return user;
        };

        if !self.password_encoder.upgrade_encoding(user.password_hash()) {
            return user;
        }

        let new_hash = match self.password_encoder.encode(presented_password) {
            Ok(new_hash) => new_hash,
            Err(error) => {
                warn!(username = user.username(), %error, "failed to re-encode password");
                return user;
            }
        };

        let fallback = user.clone();
        match password_service.update_password(user, &new_hash).await {
            Ok(updated) => {
                debug!(username = updated.username(), "upgraded stored password encoding");
                updated
            }
            Err(error) => {
                warn!(username = fallback.username(), %error, "failed to persist upgraded password");
                fallback
            }
        }
    }
}

fn check_account_status(user: &UserDetails) -> Result<(), AuthenticationError> {
    if !user.is_account_non_locked() {
        debug!(username = user.username(), "authentication failed: account is locked");
        return Err(AuthenticationError::Locked(
            "User account is locked".to_owned(),
        ));
    }

    if !user.is_enabled() {
        debug!(username = user.username(), "authentication failed: account is disabled");
        return Err(AuthenticationError::Disabled("User is disabled".to_owned()));
    }

    Ok(())
}

#[async_trait]
impl AuthenticationProvider for DaoAuthenticationProvider {
    async fn authenticate(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<Option<AuthenticatedUser>, AuthenticationError> {
        if request.username().trim().is_empty() {
            self.mitigate_against_timing_attack(request.password());
            return Err(AuthenticationError::bad_credentials());
        }

        let user = self.retrieve_user(request).await?;
        check_account_status(&user)?;
        let presented_password = self.check_credentials(&user, request)?;
        let user = self
            .upgrade_encoding_if_needed(user, presented_password)
            .await;

        Ok(Some(user.to_authenticated_user()))
    }
}
