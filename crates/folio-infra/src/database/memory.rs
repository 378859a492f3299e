//! In-memory post repository - used when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use folio_core::domain::{Post, PostDraft, PostFilter, ViewSeed};
use folio_core::error::RepoError;
use folio_core::ports::PostRepository;

use super::parse_id;

/// Post repository keyed by UUID, with the same identifier rules as the
/// database-backed one.
///
/// Note: Data is lost on process restart.
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
    view_seed: ViewSeed,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
            view_seed: ViewSeed::default(),
        }
    }

    pub fn with_view_seed(mut self, view_seed: ViewSeed) -> Self {
        self.view_seed = view_seed;
        self
    }

    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(filter.select(posts.values().cloned()))
    }

    async fn create(&self, draft: PostDraft) -> Result<Post, RepoError> {
        let new = draft.validate()?;
        let id = Uuid::new_v4();
        let post = Post::create(new, id.to_string(), self.view_seed.initial_views());

        self.posts.write().await.insert(id, post.clone());
        Ok(post)
    }

    async fn read_and_count_view(&self, id: &str) -> Result<Post, RepoError> {
        let id = parse_id(id)?;
        let mut posts = self.posts.write().await;
        let stored = posts.get_mut(&id).ok_or(RepoError::NotFound)?;

        let before = stored.clone();
        stored.views += 1;
        Ok(before)
    }

    async fn update(&self, id: &str, patch: PostDraft) -> Result<Post, RepoError> {
        let id = parse_id(id)?;
        let mut posts = self.posts.write().await;
        let stored = posts.get_mut(&id).ok_or(RepoError::NotFound)?;

        let updated = stored.apply(patch)?;
        *stored = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let id = parse_id(id)?;
        self.posts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::domain::{Category, TagsInput};
    use pretty_assertions::assert_eq;

    fn draft(title: &str, category: &str) -> PostDraft {
        PostDraft {
            title: Some(title.to_string()),
            excerpt: Some("B".to_string()),
            content: Some("C".to_string()),
            author: Some("D".to_string()),
            category: Some(category.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_read_returns_input_fields() {
        let repo = InMemoryPostRepository::new();
        let created = repo
            .create(PostDraft {
                tags: Some(TagsInput::from("a, b,")),
                ..draft("A", "React")
            })
            .await
            .unwrap();

        let read = repo.read_and_count_view(&created.id).await.unwrap();
        assert_eq!(read, created);
        assert_eq!(read.tags, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(read.category, Category::React);
        assert!(!read.id.is_empty());
    }

    #[tokio::test]
    async fn test_each_read_counts_exactly_one_view() {
        let repo = InMemoryPostRepository::new();
        let created = repo.create(draft("A", "React")).await.unwrap();

        for _ in 0..5 {
            repo.read_and_count_view(&created.id).await.unwrap();
        }

        let after = repo.read_and_count_view(&created.id).await.unwrap();
        assert_eq!(after.views, created.views + 5);
    }

    #[tokio::test]
    async fn test_update_then_delete() {
        let repo = InMemoryPostRepository::new();
        let created = repo.create(draft("A", "React")).await.unwrap();

        let updated = repo
            .update(
                &created.id,
                PostDraft {
                    excerpt: Some("New excerpt".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "A");
        assert_eq!(updated.excerpt, "New excerpt");
        assert!(updated.updated_at >= created.updated_at);

        repo.delete(&created.id).await.unwrap();
        assert!(matches!(
            repo.read_and_count_view(&created.id).await,
            Err(RepoError::NotFound)
        ));
        assert!(matches!(
            repo.delete(&created.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_identifiers_are_unique_and_checked() {
        let repo = InMemoryPostRepository::new();
        let a = repo.create(draft("A", "React")).await.unwrap();
        let b = repo.create(draft("B", "React")).await.unwrap();
        assert_ne!(a.id, b.id);

        assert!(matches!(
            repo.read_and_count_view("1718000000000").await,
            Err(RepoError::InvalidIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn test_list_by_category() {
        let repo = InMemoryPostRepository::new();
        repo.create(draft("Hooks", "React")).await.unwrap();
        repo.create(draft("Grid", "CSS")).await.unwrap();

        let react = repo
            .list(&PostFilter::new().with_category("React"))
            .await
            .unwrap();
        assert_eq!(react.len(), 1);
        assert_eq!(react[0].title, "Hooks");
        assert_eq!(repo.list(&PostFilter::new()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_random_view_seed() {
        let repo = InMemoryPostRepository::new().with_view_seed(ViewSeed::Random);
        let created = repo.create(draft("A", "React")).await.unwrap();
        assert!((100..=1099).contains(&created.views));
    }
}
