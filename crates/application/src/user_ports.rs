//! User persistence and password encoding ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use warden_core::AppResult;
use warden_domain::{EmailAddress, UserId};

/// User record returned by repository queries.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Full name shown for the account.
    pub full_name: String,
    /// Canonical (lower-cased) email address, also the login username.
    pub email: String,
    /// bcrypt password hash.
    pub password_hash: String,
    /// Whether the account may authenticate at all.
    pub enabled: bool,
    /// Whether the account is locked.
    pub locked: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user record.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    /// Full name shown for the account.
    pub full_name: String,
    /// Validated email address.
    pub email: EmailAddress,
    /// Already-encoded password hash.
    pub password_hash: String,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Creates a new user record. Fails with `Conflict` when the email is taken.
    async fn create(&self, user: NewUserRecord) -> AppResult<UserId>;

    /// Replaces the stored password hash for the user with this email.
    async fn update_password(&self, email: &str, password_hash: &str) -> AppResult<()>;
}

/// Port for one-way password encoding. Keeps application code free of
/// direct cryptographic library coupling.
pub trait PasswordEncoder: Send + Sync {
    /// Encodes a raw password.
    fn encode(&self, raw_password: &str) -> AppResult<String>;

    /// Checks a raw password against an encoded one.
    fn matches(&self, raw_password: &str, encoded_password: &str) -> AppResult<bool>;

    /// Returns `true` when the encoded password should be re-encoded for
    /// better security.
    fn upgrade_encoding(&self, _encoded_password: &str) -> bool {
        false
    }
}
