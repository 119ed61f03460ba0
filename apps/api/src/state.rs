use warden_application::AuthenticationManager;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authentication_manager: AuthenticationManager,
}
