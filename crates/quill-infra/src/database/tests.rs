#[cfg(test)]
mod tests {
    use crate::database::entity::{post, user};
    use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};
    use quill_core::domain::{Post, User};
    use quill_core::ports::{PostRepository, UserRepository};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_post_by_id() {
        // Create mock database with expected query results
        let post_id = uuid::Uuid::new_v4();
        let creator = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        // Mock the query expectation
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post::Model {
                id: post_id,
                title: "Test Post".to_owned(),
                category: "tech".to_owned(),
                description: "A post about testing".to_owned(),
                thumbnail: "thumb.png".to_owned(),
                creator,
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.title, "Test Post");
        assert_eq!(found.id, post_id);
        assert_eq!(found.creator, creator);
    }

    #[tokio::test]
    async fn test_find_user_by_email() {
        let user_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id: user_id,
                name: "Ada".to_owned(),
                email: "ada@example.com".to_owned(),
                password_hash: "$argon2id$fake".to_owned(),
                avatar: None,
                posts: 0,
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);

        let result: Option<User> = repo.find_by_email("ada@example.com").await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.id, user_id);
        assert_eq!(found.email, "ada@example.com");
    }
}
