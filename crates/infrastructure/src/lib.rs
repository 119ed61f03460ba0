//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod bcrypt_password_encoder;
mod in_memory_user_repository;
mod postgres_user_repository;

pub use bcrypt_password_encoder::{BcryptPasswordEncoder, DEFAULT_BCRYPT_COST};
pub use in_memory_user_repository::InMemoryUserRepository;
pub use postgres_user_repository::PostgresUserRepository;
