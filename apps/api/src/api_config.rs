use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use tracing_subscriber::EnvFilter;
use warden_core::AppError;
use warden_infrastructure::DEFAULT_BCRYPT_COST;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserStoreConfig {
    Postgres { database_url: String },
    InMemory,
}

#[derive(Clone, PartialEq, Eq)]
pub struct SeedUserConfig {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl std::fmt::Debug for SeedUserConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SeedUserConfig")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub user_store: UserStoreConfig,
    pub api_host: String,
    pub api_port: u16,
    pub bcrypt_cost: u32,
    pub seed_user: Option<SeedUserConfig>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    pub fn from_lookup(
        migrate_only: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let user_store = match lookup("USER_STORE")
            .unwrap_or_else(|| "postgres".to_owned())
            .as_str()
        {
            "postgres" => UserStoreConfig::Postgres {
                database_url: required_non_empty(&lookup, "DATABASE_URL")?,
            },
            "memory" => UserStoreConfig::InMemory,
            other => {
                return Err(AppError::Validation(format!(
                    "USER_STORE must be either 'postgres' or 'memory', got '{other}'"
                )));
            }
        };

        if migrate_only && user_store == UserStoreConfig::InMemory {
            return Err(AppError::Validation(
                "migrate requires USER_STORE=postgres".to_owned(),
            ));
        }

        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = lookup("API_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let bcrypt_cost = match lookup("BCRYPT_COST").filter(|value| !value.trim().is_empty()) {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .map_err(|error| AppError::Validation(format!("invalid BCRYPT_COST: {error}")))?,
            None => DEFAULT_BCRYPT_COST,
        };

        let seed_user = match lookup("DEV_SEED_EMAIL").filter(|value| !value.trim().is_empty()) {
            Some(email) => Some(SeedUserConfig {
                email,
                password: required_non_empty(&lookup, "DEV_SEED_PASSWORD")?,
                full_name: lookup("DEV_SEED_FULL_NAME")
                    .filter(|value| !value.trim().is_empty())
                    .unwrap_or_else(|| "Development User".to_owned()),
            }),
            None => None,
        };

        Ok(Self {
            migrate_only,
            user_store,
            api_host,
            api_port,
            bcrypt_cost,
            seed_user,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, AppError> {
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{ApiConfig, UserStoreConfig};

    fn load(migrate_only: bool, vars: &[(&str, &str)]) -> Result<ApiConfig, warden_core::AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ApiConfig::from_lookup(migrate_only, |name| vars.get(name).cloned())
    }

    #[test]
    fn postgres_is_the_default_store_and_needs_a_url() {
        assert!(load(false, &[]).is_err());

        let config = load(false, &[("DATABASE_URL", "postgres://localhost/warden")]);
        let config = config.unwrap_or_else(|error| panic!("unexpected error: {error}"));
        assert_eq!(
            config.user_store,
            UserStoreConfig::Postgres {
                database_url: "postgres://localhost/warden".to_owned()
            }
        );
        assert_eq!(config.api_port, 3001);
        assert_eq!(config.bcrypt_cost, 10);
        assert!(config.seed_user.is_none());
    }

    #[test]
    fn memory_store_needs_no_database() {
        let config = load(false, &[("USER_STORE", "memory"), ("API_PORT", "8080")])
            .unwrap_or_else(|error| panic!("unexpected error: {error}"));

        assert_eq!(config.user_store, UserStoreConfig::InMemory);
        assert_eq!(config.api_port, 8080);
    }

    #[test]
    fn unknown_store_is_rejected() {
        assert!(load(false, &[("USER_STORE", "ldap")]).is_err());
    }

    #[test]
    fn migrate_requires_postgres() {
        assert!(load(true, &[("USER_STORE", "memory")]).is_err());
    }

    #[test]
    fn bcrypt_cost_must_be_numeric() {
        assert!(load(false, &[("USER_STORE", "memory"), ("BCRYPT_COST", "high")]).is_err());

        let config = load(false, &[("USER_STORE", "memory"), ("BCRYPT_COST", "12")])
            .unwrap_or_else(|error| panic!("unexpected error: {error}"));
        assert_eq!(config.bcrypt_cost, 12);
    }

    #[test]
    fn seed_user_requires_password() {
        assert!(
            load(
                false,
                &[("USER_STORE", "memory"), ("DEV_SEED_EMAIL", "dev@example.com")]
            )
            .is_err()
        );

        let config = load(
            false,
            &[
                ("USER_STORE", "memory"),
                ("DEV_SEED_EMAIL", "dev@example.com"),
                ("DEV_SEED_PASSWORD", "dev-password"),
            ],
        )
        .unwrap_or_else(|error| panic!("unexpected error: {error}"));
        let seed = config
            .seed_user
            .unwrap_or_else(|| panic!("seed user should be configured"));
        assert_eq!(seed.full_name, "Development User");
        assert!(!format!("{seed:?}").contains("dev-password"));
    }

    #[test]
    fn socket_address_rejects_hostnames() {
        let mut config = load(false, &[("USER_STORE", "memory")])
            .unwrap_or_else(|error| panic!("unexpected error: {error}"));
        config.api_host = "localhost".to_owned();
        assert!(config.socket_address().is_err());
    }
}
