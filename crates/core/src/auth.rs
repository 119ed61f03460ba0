use std::fmt::{Debug, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Username/password pair presented by a caller.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthenticationRequest {
    username: String,
    password: Option<String>,
}

impl AuthenticationRequest {
    /// Creates a request carrying the presented credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Some(password.into()),
        }
    }

    /// Creates a request that presents a username without a password.
    ///
    /// Password-based providers reject such requests as bad credentials.
    #[must_use]
    pub fn without_password(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: None,
        }
    }

    /// Returns the presented username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the presented password, if any.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

impl Debug for AuthenticationRequest {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AuthenticationRequest")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Principal produced by a successful authentication. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    username: String,
    display_name: String,
    authorities: Vec<String>,
}

impl AuthenticatedUser {
    /// Creates an authenticated principal.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        display_name: impl Into<String>,
        authorities: Vec<String>,
    ) -> Self {
        Self {
            username: username.into(),
            display_name: display_name.into(),
            authorities,
        }
    }

    /// Returns the username the principal authenticated with.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the display name for the principal.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the granted authorities.
    #[must_use]
    pub fn authorities(&self) -> &[String] {
        self.authorities.as_slice()
    }
}

/// Reasons an authentication attempt can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthenticationError {
    /// No user exists for the presented username.
    #[error("{0}")]
    UsernameNotFound(String),

    /// Presented credentials do not match.
    #[error("{0}")]
    BadCredentials(String),

    /// Account exists but is disabled.
    #[error("{0}")]
    Disabled(String),

    /// Account exists but is locked.
    #[error("{0}")]
    Locked(String),

    /// No configured provider handled the request.
    #[error("{0}")]
    ProviderNotFound(String),

    /// The user store or encoder failed while authenticating.
    #[error("{0}")]
    Service(String),
}

impl AuthenticationError {
    /// Generic credential failure that does not reveal which part was wrong.
    #[must_use]
    pub fn bad_credentials() -> Self {
        Self::BadCredentials("Bad credentials".to_owned())
    }

    /// Account status failures stop the authentication chain immediately.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Disabled(_) | Self::Locked(_) | Self::Service(_))
    }
}
