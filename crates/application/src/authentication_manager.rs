use std::sync::Arc;

use tracing::debug;

use warden_core::{
    AppError, AppResult, AuthenticatedUser, AuthenticationError, AuthenticationRequest,
};

use crate::AuthenticationProvider;

/// Delegates authentication to an ordered list of providers.
#[derive(Clone)]
pub struct AuthenticationManager {
    providers: Vec<Arc<dyn AuthenticationProvider>>,
}

impl AuthenticationManager {
    /// Creates a manager over the given providers, tried in order.
    pub fn new(providers: Vec<Arc<dyn AuthenticationProvider>>) -> AppResult<Self> {
        if providers.is_empty() {
            return Err(AppError::Validation(
                "at least one authentication provider is required".to_owned(),
            ));
        }

        Ok(Self { providers })
    }

    /// Creates a manager with a single provider.
    #[must_use]
    pub fn single(provider: Arc<dyn AuthenticationProvider>) -> Self {
        Self {
            providers: vec![provider],
        }
    }

    /// Authenticates the request with the first provider that accepts it.
    ///
    /// Account status and service failures end the attempt immediately;
    /// other failures let the next provider try, and the last one is
    /// returned if nothing succeeds.
    pub async fn authenticate(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<AuthenticatedUser, AuthenticationError> {
        let mut last_error = None;

        for provider in &self.providers {
            match provider.authenticate(request).await {
                Ok(Some(user)) => {
                    debug!(username = user.username(), "authentication succeeded");
                    return Ok(user);
                }
                Ok(None) => {}
                Err(error) if error.is_terminal() => {
                    debug!(username = request.username(), %error, "authentication aborted");
                    return Err(error);
                }
                Err(error) => last_error = Some(error),
            }
        }

        let error = last_error.unwrap_or_else(|| {
            AuthenticationError::ProviderNotFound(
                "No authentication provider handled the request".to_owned(),
            )
        });
        debug!(username = request.username(), %error, "authentication failed");
        Err(error)
    }
}
