//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod user;

pub use user::{EmailAddress, PASSWORD_MAX_BYTES, UserId, validate_raw_password};
