use warden_application::AuthenticationConfiguration;

use crate::state::AppState;

pub fn build_app_state(configuration: &AuthenticationConfiguration) -> AppState {
    AppState {
        authentication_manager: configuration.authentication_manager(),
    }
}
