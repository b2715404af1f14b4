//! In-memory repositories - used as fallback when no database is configured.
//!
//! Both repositories share one [`InMemoryStore`] behind a single lock, which
//! gives the post/counter write pairs the same all-or-nothing behavior the
//! Postgres implementations get from a transaction.
//! Note: Data is lost on process restart.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{PostRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
}

/// Shared backing store for the in-memory repositories.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

/// In-memory user repository.
pub struct InMemoryUserRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryUserRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

/// In-memory post repository.
pub struct InMemoryPostRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryPostRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.clone())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, mut user: User) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        let slot = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepoError::NotFound)?;
        user.updated_at = Utc::now();
        *slot = user.clone();
        Ok(user)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn find_recent(&self) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut posts = tables.posts.clone();
        posts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(posts)
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn find_by_creator(&self, creator: Uuid) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .iter()
            .filter(|p| p.creator == creator)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn create(&self, new_post: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        let creator = tables
            .users
            .iter_mut()
            .find(|u| u.id == new_post.creator)
            .ok_or_else(|| RepoError::Constraint("Post creator does not exist".to_string()))?;
        creator.posts += 1;
        tables.posts.push(new_post.clone());
        Ok(new_post)
    }

    async fn update(&self, mut edited: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        let slot = tables
            .posts
            .iter_mut()
            .find(|p| p.id == edited.id)
            .ok_or(RepoError::NotFound)?;
        edited.updated_at = Utc::now();
        *slot = edited.clone();
        Ok(edited)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        let index = tables
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        let removed = tables.posts.remove(index);

        // Counter decrement is floored at zero.
        if let Some(creator) = tables.users.iter_mut().find(|u| u.id == removed.creator) {
            creator.posts = (creator.posts - 1).max(0);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(name: &str, email: &str) -> User {
        User::new(name.to_string(), email.to_string(), "hash".to_string())
    }

    fn sample_post(creator: Uuid, title: &str, category: &str) -> Post {
        Post::new(
            creator,
            title.to_string(),
            category.to_string(),
            "A description long enough".to_string(),
            "thumb.png".to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_increments_creator_counter() {
        let store = InMemoryStore::new();
        let users = InMemoryUserRepository::new(store.clone());
        let posts = InMemoryPostRepository::new(store);

        let user = users.insert(sample_user("Ada", "ada@example.com")).await.unwrap();
        posts.create(sample_post(user.id, "First", "tech")).await.unwrap();
        posts.create(sample_post(user.id, "Second", "tech")).await.unwrap();

        let user = users.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(user.posts, 2);
    }

    #[tokio::test]
    async fn test_delete_decrements_counter_floored_at_zero() {
        let store = InMemoryStore::new();
        let users = InMemoryUserRepository::new(store.clone());
        let posts = InMemoryPostRepository::new(store);

        let user = users.insert(sample_user("Ada", "ada@example.com")).await.unwrap();
        let post = posts.create(sample_post(user.id, "Only", "tech")).await.unwrap();

        posts.delete(post.id).await.unwrap();
        assert_eq!(users.find_by_id(user.id).await.unwrap().unwrap().posts, 0);

        // Deleting again via a stale reference fails and cannot go negative.
        assert!(matches!(
            posts.delete(post.id).await,
            Err(RepoError::NotFound)
        ));
        assert_eq!(users.find_by_id(user.id).await.unwrap().unwrap().posts, 0);
    }

    #[tokio::test]
    async fn test_create_for_unknown_creator_is_rejected() {
        let store = InMemoryStore::new();
        let posts = InMemoryPostRepository::new(store);

        let result = posts.create(sample_post(Uuid::new_v4(), "Orphan", "tech")).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_find_recent_orders_by_updated_at_desc() {
        let store = InMemoryStore::new();
        let users = InMemoryUserRepository::new(store.clone());
        let posts = InMemoryPostRepository::new(store);

        let user = users.insert(sample_user("Ada", "ada@example.com")).await.unwrap();
        let first = posts.create(sample_post(user.id, "First", "tech")).await.unwrap();
        posts.create(sample_post(user.id, "Second", "tech")).await.unwrap();

        // Touching the older post moves it back to the front.
        posts.update(first.clone()).await.unwrap();

        let listed = posts.find_recent().await.unwrap();
        assert_eq!(listed[0].id, first.id);
    }

    #[tokio::test]
    async fn test_find_by_category_is_exact_and_newest_first() {
        let store = InMemoryStore::new();
        let users = InMemoryUserRepository::new(store.clone());
        let posts = InMemoryPostRepository::new(store);

        let user = users.insert(sample_user("Ada", "ada@example.com")).await.unwrap();
        posts.create(sample_post(user.id, "Older", "tech")).await.unwrap();
        posts.create(sample_post(user.id, "Other", "technology")).await.unwrap();
        posts.create(sample_post(user.id, "Newer", "tech")).await.unwrap();

        let listed = posts.find_by_category("tech").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "Newer");
        assert_eq!(listed[1].title, "Older");
    }

    #[tokio::test]
    async fn test_duplicate_email_insert_is_rejected() {
        let store = InMemoryStore::new();
        let users = InMemoryUserRepository::new(store);

        users.insert(sample_user("Ada", "ada@example.com")).await.unwrap();
        let result = users.insert(sample_user("Imposter", "ada@example.com")).await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }
}
