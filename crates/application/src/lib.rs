//! Application services and ports.

#![forbid(unsafe_code)]

mod authentication_configuration;
mod authentication_manager;
mod authentication_provider;
mod user_details_service;
mod user_ports;

#[cfg(test)]
mod test_support;

pub use authentication_configuration::AuthenticationConfiguration;
pub use authentication_manager::AuthenticationManager;
pub use authentication_provider::{AuthenticationProvider, DaoAuthenticationProvider};
pub use user_details_service::{
    RepositoryUserDetailsService, USER_NOT_FOUND_MESSAGE, UserDetails, UserDetailsPasswordService,
    UserDetailsService,
};
pub use user_ports::{NewUserRecord, PasswordEncoder, UserRecord, UserRepository};
