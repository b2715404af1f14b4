//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the database repositories, authentication services
//! and the local upload file store.

pub mod auth;
pub mod database;
pub mod files;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{
    DatabaseConfig, InMemoryPostRepository, InMemoryStore, InMemoryUserRepository,
    PostgresPostRepository, PostgresUserRepository,
};
pub use files::LocalFileStore;
