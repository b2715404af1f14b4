//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{FileStore, PostRepository, UserRepository};
use quill_infra::database::{
    self, DatabaseConfig, InMemoryPostRepository, InMemoryStore, InMemoryUserRepository,
    PostgresPostRepository, PostgresUserRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub files: Arc<dyn FileStore>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>, files: Arc<dyn FileStore>) -> Self {
        let (users, posts) = match db_config {
            Some(config) => match database::connect(config).await {
                Ok(conn) => {
                    let users: Arc<dyn UserRepository> =
                        Arc::new(PostgresUserRepository::new(conn.clone()));
                    let posts: Arc<dyn PostRepository> =
                        Arc::new(PostgresPostRepository::new(conn));
                    (users, posts)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory()
            }
        };

        tracing::info!("Application state initialized");

        Self {
            users,
            posts,
            files,
        }
    }

    fn in_memory() -> (Arc<dyn UserRepository>, Arc<dyn PostRepository>) {
        let store = InMemoryStore::new();
        (
            Arc::new(InMemoryUserRepository::new(store.clone())),
            Arc::new(InMemoryPostRepository::new(store)),
        )
    }
}
