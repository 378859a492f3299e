#[cfg(test)]
mod tests {
    use crate::database::SeaOrmPostRepository;
    use crate::database::entity::post;
    use folio_core::RepoError;
    use folio_core::domain::{Category, PostDraft, PostFilter, TagsInput};
    use folio_core::ports::PostRepository;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn model(id: uuid::Uuid, title: &str, views: i64) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            title: title.to_owned(),
            excerpt: "Excerpt".to_owned(),
            content: "Content".to_owned(),
            author: "Rafi".to_owned(),
            category: "React".to_owned(),
            tags: serde_json::json!(["react", "hooks"]),
            image: None,
            external_link: None,
            read_time: "5 min read".to_owned(),
            featured: false,
            views,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn draft() -> PostDraft {
        PostDraft {
            title: Some("Test Post".to_string()),
            excerpt: Some("Excerpt".to_string()),
            content: Some("Content".to_string()),
            author: Some("Rafi".to_string()),
            category: Some("React".to_string()),
            tags: Some(TagsInput::from("react, hooks")),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_read_returns_post_and_counts_view() {
        let post_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model(post_id, "Test Post", 7)]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repo = SeaOrmPostRepository::new(db);
        let post = repo.read_and_count_view(&post_id.to_string()).await.unwrap();

        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, post_id.to_string());
        assert_eq!(post.views, 7);
        assert_eq!(post.tags, vec!["react".to_string(), "hooks".to_string()]);
    }

    #[tokio::test]
    async fn test_read_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = SeaOrmPostRepository::new(db);
        let err = repo
            .read_and_count_view(&uuid::Uuid::new_v4().to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn test_malformed_id_never_reaches_database() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = SeaOrmPostRepository::new(db);

        assert!(matches!(
            repo.read_and_count_view("123").await,
            Err(RepoError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            repo.delete("123").await,
            Err(RepoError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            repo.update("123", PostDraft::default()).await,
            Err(RepoError::InvalidIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn test_create_validates_before_insert() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = SeaOrmPostRepository::new(db);

        let err = repo
            .create(PostDraft {
                category: Some("NotARealCategory".to_string()),
                ..draft()
            })
            .await
            .unwrap_err();

        match err {
            RepoError::Validation(e) => assert!(e.mentions("category")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_returns_stored_row() {
        let post_id = uuid::Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model(post_id, "Test Post", 0)]])
            .into_connection();

        let repo = SeaOrmPostRepository::new(db);
        let post = repo.create(draft()).await.unwrap();

        assert_eq!(post.category, Category::React);
        assert_eq!(post.views, 0);
    }

    #[tokio::test]
    async fn test_list_converts_every_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                model(uuid::Uuid::new_v4(), "Newer", 1),
                model(uuid::Uuid::new_v4(), "Older", 2),
            ]])
            .into_connection();

        let repo = SeaOrmPostRepository::new(db);
        let posts = repo.list(&PostFilter::new()).await.unwrap();

        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
    }

    #[tokio::test]
    async fn test_list_rejects_corrupt_category_row() {
        let mut row = model(uuid::Uuid::new_v4(), "Broken", 0);
        row.category = "Cobol".to_owned();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row]])
            .into_connection();

        let repo = SeaOrmPostRepository::new(db);
        assert!(matches!(
            repo.list(&PostFilter::new()).await,
            Err(RepoError::Query(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = SeaOrmPostRepository::new(db);
        let err = repo
            .delete(&uuid::Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn test_update_merges_over_stored_post() {
        let post_id = uuid::Uuid::new_v4();
        let mut saved = model(post_id, "Renamed", 3);
        saved.featured = true;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model(post_id, "Test Post", 3)]])
            .append_query_results(vec![vec![saved]])
            .into_connection();

        let repo = SeaOrmPostRepository::new(db);
        let post = repo
            .update(
                &post_id.to_string(),
                PostDraft {
                    title: Some("Renamed".to_string()),
                    featured: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(post.title, "Renamed");
        assert!(post.featured);
        assert_eq!(post.views, 3);
    }
}
