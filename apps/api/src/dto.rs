use serde::Serialize;
use warden_core::AuthenticatedUser;

/// Liveness payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// The authenticated principal as returned by `/api/me`.
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub username: String,
    pub display_name: String,
    pub authorities: Vec<String>,
}

impl From<AuthenticatedUser> for CurrentUserResponse {
    fn from(value: AuthenticatedUser) -> Self {
        Self {
            username: value.username().to_owned(),
            display_name: value.display_name().to_owned(),
            authorities: value.authorities().to_vec(),
        }
    }
}
