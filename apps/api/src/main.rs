//! Warden API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dev_seed;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use tracing::{info, warn};
use warden_application::{AuthenticationConfiguration, UserRepository};
use warden_core::AppError;
use warden_infrastructure::{BcryptPasswordEncoder, InMemoryUserRepository, PostgresUserRepository};

use crate::api_config::{ApiConfig, UserStoreConfig};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;

    let user_repository: Arc<dyn UserRepository> = match &config.user_store {
        UserStoreConfig::Postgres { database_url } => {
            let pool = api_services::connect_and_migrate(database_url).await?;
            if config.migrate_only {
                info!("migrations complete");
                return Ok(());
            }

            Arc::new(PostgresUserRepository::new(pool))
        }
        UserStoreConfig::InMemory => {
            warn!("using the in-memory user store; accounts are lost on restart");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    let password_encoder = Arc::new(BcryptPasswordEncoder::new(config.bcrypt_cost)?);
    let authentication =
        AuthenticationConfiguration::new(user_repository.clone(), password_encoder);

    if let Some(seed) = &config.seed_user {
        dev_seed::ensure_seed_user(
            user_repository.as_ref(),
            authentication.password_encoder().as_ref(),
            seed,
        )
        .await?;
    }

    let app = api_router::build_router(api_services::build_app_state(&authentication));

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(%address, "warden-api listening");
    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("server error: {error}")))
}
