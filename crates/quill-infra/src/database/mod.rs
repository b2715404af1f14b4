//! Database connection management and repositories.

mod connections;
pub mod entity;
mod memory;
pub mod postgres_repo;

pub use connections::{DatabaseConfig, connect};
pub use memory::{InMemoryPostRepository, InMemoryStore, InMemoryUserRepository};
pub use postgres_repo::{PostgresPostRepository, PostgresUserRepository};

#[cfg(test)]
mod tests;
