//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use sqlx::PgPool;

use warden_application::{NewUserRecord, UserRecord, UserRepository};
use warden_core::{AppError, AppResult};
use warden_domain::UserId;

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    full_name: String,
    email: String,
    password_hash: String,
    enabled: bool,
    locked: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            full_name: row.full_name,
            email: row.email,
            password_hash: row.password_hash,
            enabled: row.enabled,
            locked: row.locked,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

mod account;
mod lookup;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        self.find_by_email_impl(email).await
    }

    async fn create(&self, user: NewUserRecord) -> AppResult<UserId> {
        self.create_impl(user).await
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> AppResult<()> {
        self.update_password_impl(email, password_hash).await
    }
}

fn email_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict("an account with this email already exists".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
