//! bcrypt password encoder.
//!
//! Produces `$2a$` hashes at a fixed cost (default 10). Hashes stored at a
//! lower cost are reported as needing an upgrade.

use bcrypt::Version;
use tracing::warn;
use warden_application::PasswordEncoder;
use warden_core::{AppError, AppResult};
use warden_domain::{PASSWORD_MAX_BYTES, validate_raw_password};

/// Cost used when none is configured.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// Salt plus checksum, radix-64 encoded.
const BCRYPT_PAYLOAD_LEN: usize = 53;

/// bcrypt encoder with a fixed cost factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordEncoder {
    cost: u32,
}

impl BcryptPasswordEncoder {
    /// Creates an encoder with the given cost (4..=31).
    pub fn new(cost: u32) -> AppResult<Self> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            return Err(AppError::Validation(format!(
                "bcrypt cost must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}, got {cost}"
            )));
        }

        Ok(Self { cost })
    }

    /// Returns the configured cost.
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordEncoder {
    fn default() -> Self {
        Self {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

/// Returns the cost of a well-formed bcrypt hash, or `None` for anything else.
fn bcrypt_cost(encoded: &str) -> Option<u32> {
    let rest = encoded.strip_prefix("$2")?;
    let rest = rest.strip_prefix(['a', 'b', 'y'])?;
    let (cost, payload) = rest.strip_prefix('$')?.split_once('$')?;

    if cost.len() != 2 || !cost.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    let payload_is_radix64 = payload
        .bytes()
        .all(|byte| byte.is_ascii_alphanumeric() || byte == b'.' || byte == b'/');
    if payload.len() != BCRYPT_PAYLOAD_LEN || !payload_is_radix64 {
        return None;
    }

    cost.parse()
        .ok()
        .filter(|cost| (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(cost))
}

impl PasswordEncoder for BcryptPasswordEncoder {
    fn encode(&self, raw_password: &str) -> AppResult<String> {
        validate_raw_password(raw_password)?;

        let parts = bcrypt::hash_with_result(raw_password, self.cost)
            .map_err(|error| AppError::Internal(format!("failed to hash password: {error}")))?;

        Ok(parts.format_for_version(Version::TwoA))
    }

    fn matches(&self, raw_password: &str, encoded_password: &str) -> AppResult<bool> {
        if encoded_password.is_empty() {
            warn!("empty encoded password");
            return Ok(false);
        }

        if bcrypt_cost(encoded_password).is_none() {
            warn!("encoded password does not look like bcrypt");
            return Ok(false);
        }

        // Longer inputs would be silently truncated and could match a prefix.
        if raw_password.len() > PASSWORD_MAX_BYTES {
            return Ok(false);
        }

        bcrypt::verify(raw_password, encoded_password)
            .map_err(|error| AppError::Internal(format!("password verification failed: {error}")))
    }

    fn upgrade_encoding(&self, encoded_password: &str) -> bool {
        match bcrypt_cost(encoded_password) {
            Some(cost) => cost < self.cost,
            None => {
                warn!("encoded password does not look like bcrypt");
                false
            }
        }
    }
}
