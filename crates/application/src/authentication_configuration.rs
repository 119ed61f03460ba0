//! Wiring for repository-backed password authentication.
//!
//! Replaces the default credential store: users are looked up by email
//! through the injected [`UserRepository`] and passwords are checked with the
//! injected [`PasswordEncoder`]. Every component is built once, here, and
//! shared through `Arc`.

use std::sync::Arc;

use crate::{
    AuthenticationManager, AuthenticationProvider, DaoAuthenticationProvider, PasswordEncoder,
    RepositoryUserDetailsService, UserDetailsService, UserRepository,
};

/// Authentication components built over a user repository.
#[derive(Clone)]
pub struct AuthenticationConfiguration {
    user_details_service: Arc<RepositoryUserDetailsService>,
    password_encoder: Arc<dyn PasswordEncoder>,
    authentication_provider: Arc<DaoAuthenticationProvider>,
}

impl AuthenticationConfiguration {
    /// Builds the lookup service, provider and manager inputs.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_encoder: Arc<dyn PasswordEncoder>,
    ) -> Self {
        let user_details_service = Arc::new(RepositoryUserDetailsService::new(user_repository));
        let authentication_provider = Arc::new(
            DaoAuthenticationProvider::new(user_details_service.clone(), password_encoder.clone())
                .with_password_service(user_details_service.clone()),
        );

        Self {
            user_details_service,
            password_encoder,
            authentication_provider,
        }
    }

    /// Email-keyed user lookup.
    #[must_use]
    pub fn user_details_service(&self) -> Arc<dyn UserDetailsService> {
        self.user_details_service.clone()
    }

    /// The shared password encoder.
    #[must_use]
    pub fn password_encoder(&self) -> Arc<dyn PasswordEncoder> {
        self.password_encoder.clone()
    }

    /// The repository-backed provider.
    #[must_use]
    pub fn authentication_provider(&self) -> Arc<dyn AuthenticationProvider> {
        self.authentication_provider.clone()
    }

    /// Manager over the configured provider, for use by the HTTP layer.
    #[must_use]
    pub fn authentication_manager(&self) -> AuthenticationManager {
        AuthenticationManager::single(self.authentication_provider())
    }
}
