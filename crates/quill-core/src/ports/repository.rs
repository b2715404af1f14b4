use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, User};
use crate::error::RepoError;

/// User repository.
///
/// There is deliberately no delete: accounts are never hard-deleted by any
/// exposed operation.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    /// Find a user by their (already lowercased) email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// All users, store order.
    async fn find_all(&self) -> Result<Vec<User>, RepoError>;

    /// Insert a new user.
    async fn insert(&self, user: User) -> Result<User, RepoError>;

    /// Update an existing user, stamping `updated_at`.
    async fn update(&self, user: User) -> Result<User, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find a post by its unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// All posts, most recently updated first.
    async fn find_recent(&self) -> Result<Vec<Post>, RepoError>;

    /// Posts with an exact category match, most recently created first.
    async fn find_by_category(&self, category: &str) -> Result<Vec<Post>, RepoError>;

    /// Posts by a given creator, most recently created first.
    async fn find_by_creator(&self, creator: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Insert a post and increment the creator's post counter.
    ///
    /// Both writes happen in a single transaction so the counter cannot
    /// drift from the actual post count.
    async fn create(&self, post: Post) -> Result<Post, RepoError>;

    /// Update an existing post, stamping `updated_at`.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    /// Delete a post and decrement the creator's post counter, floored at
    /// zero. Both writes happen in a single transaction.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}
