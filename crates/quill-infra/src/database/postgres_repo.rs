//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn query_err(err: sea_orm::DbErr) -> RepoError {
    let err_str = err.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint("Entity already exists".to_string())
    } else {
        RepoError::Query(err_str)
    }
}

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let masked_local = if local.len() > 1 {
            format!("{}***", &local[..1])
        } else {
            "***".to_string()
        };
        format!("{}{}", masked_local, domain)
    } else {
        "***".to_string()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find().all(&self.db).await.map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let active: user::ActiveModel = user.into();
        let model = active.insert(&self.db).await.map_err(query_err)?;

        Ok(model.into())
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut active: user::ActiveModel = user.into();
        active.updated_at = Set(Utc::now().into());

        let model = active.update(&self.db).await.map_err(query_err)?;

        Ok(model.into())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_recent(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::UpdatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Category.eq(category))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_creator(&self, creator: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Creator.eq(creator))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, new_post: Post) -> Result<Post, RepoError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        let active: post::ActiveModel = new_post.into();
        let model = active.insert(&txn).await.map_err(query_err)?;

        let creator = UserEntity::find_by_id(model.creator)
            .one(&txn)
            .await
            .map_err(query_err)?
            .ok_or_else(|| RepoError::Constraint("Post creator does not exist".to_string()))?;

        let count = creator.posts;
        let mut creator_active = creator.into_active_model();
        creator_active.posts = Set(count + 1);
        creator_active.update(&txn).await.map_err(query_err)?;

        txn.commit()
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(model.into())
    }

    async fn update(&self, edited: Post) -> Result<Post, RepoError> {
        let mut active: post::ActiveModel = edited.into();
        active.updated_at = Set(Utc::now().into());

        let model = active.update(&self.db).await.map_err(query_err)?;

        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        let Some(model) = PostEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(query_err)?
        else {
            return Err(RepoError::NotFound);
        };

        PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(query_err)?;

        // Counter decrement is floored at zero.
        if let Some(creator) = UserEntity::find_by_id(model.creator)
            .one(&txn)
            .await
            .map_err(query_err)?
        {
            let count = creator.posts;
            let mut creator_active = creator.into_active_model();
            creator_active.posts = Set((count - 1).max(0));
            creator_active.update(&txn).await.map_err(query_err)?;
        }

        txn.commit()
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(())
    }
}
