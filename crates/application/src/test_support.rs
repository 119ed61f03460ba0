use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use warden_core::{AppError, AppResult};
use warden_domain::UserId;

use crate::{NewUserRecord, PasswordEncoder, UserRecord, UserRepository};

pub(crate) fn sample_user(email: &str, password_hash: &str) -> UserRecord {
    let now = Utc::now();
    UserRecord {
        id: UserId::new(),
        full_name: "Test User".to_owned(),
        email: email.to_owned(),
        password_hash: password_hash.to_owned(),
        enabled: true,
        locked: false,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
pub(crate) struct FakeUserRepository {
    users: Mutex<Vec<UserRecord>>,
    lookups: Mutex<Vec<String>>,
    fail_lookups: AtomicBool,
    fail_updates: AtomicBool,
}

impl FakeUserRepository {
    pub(crate) fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            users: Mutex::new(users),
            ..Self::default()
        }
    }

    pub(crate) fn fail_lookups(&self) {
        self.fail_lookups.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    pub(crate) fn lookups(&self) -> Vec<String> {
        self.lookups
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub(crate) fn stored_hash(&self, email: &str) -> Option<String> {
        self.users.lock().ok().and_then(|users| {
            users
                .iter()
                .find(|user| user.email == email)
                .map(|user| user.password_hash.clone())
        })
    }
}

fn lock_error(error: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("failed to lock repo state: {error}"))
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        self.lookups.lock().map_err(lock_error)?.push(email.to_owned());

        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(AppError::Internal("user store unavailable".to_owned()));
        }

        Ok(self
            .users
            .lock()
            .map_err(lock_error)?
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, user: NewUserRecord) -> AppResult<UserId> {
        let mut users = self.users.lock().map_err(lock_error)?;
        if users.iter().any(|existing| existing.email == user.email.as_str()) {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let mut record = sample_user(user.email.as_str(), &user.password_hash);
        record.full_name = user.full_name;
        let id = record.id;
        users.push(record);
        Ok(id)
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> AppResult<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Internal("user store unavailable".to_owned()));
        }

        let mut users = self.users.lock().map_err(lock_error)?;
        let user = users
            .iter_mut()
            .find(|user| user.email == email)
            .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;
        user.password_hash = password_hash.to_owned();
        Ok(())
    }
}

/// Reversible test encoder: `plain:<raw>` is current, `legacy:<raw>` needs an upgrade.
#[derive(Default)]
pub(crate) struct PlainPasswordEncoder {
    encodes: AtomicUsize,
    matches: AtomicUsize,
}

impl PlainPasswordEncoder {
    pub(crate) fn encode_calls(&self) -> usize {
        self.encodes.load(Ordering::SeqCst)
    }

    pub(crate) fn match_calls(&self) -> usize {
        self.matches.load(Ordering::SeqCst)
    }
}

impl PasswordEncoder for PlainPasswordEncoder {
    fn encode(&self, raw_password: &str) -> AppResult<String> {
        self.encodes.fetch_add(1, Ordering::SeqCst);
        Ok(format!("plain:{raw_password}"))
    }

    fn matches(&self, raw_password: &str, encoded_password: &str) -> AppResult<bool> {
        self.matches.fetch_add(1, Ordering::SeqCst);

        let stored = encoded_password
            .strip_prefix("plain:")
            .or_else(|| encoded_password.strip_prefix("legacy:"))
            .ok_or_else(|| AppError::Internal("unrecognized test hash".to_owned()))?;
        Ok(stored == raw_password)
    }

    fn upgrade_encoding(&self, encoded_password: &str) -> bool {
        encoded_password.starts_with("legacy:")
    }
}
