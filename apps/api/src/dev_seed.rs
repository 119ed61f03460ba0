use tracing::info;
use warden_application::{NewUserRecord, PasswordEncoder, UserRepository};
use warden_core::{AppResult, NonEmptyString};
use warden_domain::EmailAddress;

use crate::api_config::SeedUserConfig;

/// Creates the configured development user unless an account with that email exists.
pub async fn ensure_seed_user(
    user_repository: &dyn UserRepository,
    password_encoder: &dyn PasswordEncoder,
    seed: &SeedUserConfig,
) -> AppResult<()> {
    let email = EmailAddress::new(&seed.email)?;

    if user_repository
        .find_by_email(email.as_str())
        .await?
        .is_some()
    {
        info!(email = email.as_str(), "dev seed user already exists");
        return Ok(());
    }

    let full_name = NonEmptyString::new(seed.full_name.clone())?;
    let password_hash = password_encoder.encode(&seed.password)?;

    let seeded_email = String::from(email.clone());
    let user_id = user_repository
        .create(NewUserRecord {
            full_name: full_name.into(),
            email,
            password_hash,
        })
        .await?;

    info!(email = %seeded_email, user_id = %user_id, "dev seed user created");
    Ok(())
}
