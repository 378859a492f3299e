use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use folio_core::domain::{Post, PostDraft, PostFilter};
use folio_core::error::RepoError;
use folio_core::ports::{LocalStorage, PostRepository};

/// Storage key holding the JSON list of posts.
pub const POSTS_KEY: &str = "blogPosts";

/// Post repository persisted as one JSON list under [`POSTS_KEY`].
///
/// Identifiers are millisecond timestamps rendered as decimal strings.
/// Every mutation is a read-modify-write of the whole list.
pub struct LocalPostRepository {
    storage: Arc<dyn LocalStorage>,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl LocalPostRepository {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<Post>, RepoError> {
        match self.storage.get(POSTS_KEY).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                RepoError::LocalStore(format!("Corrupt `{}` data: {}", POSTS_KEY, e))
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn store(&self, posts: &[Post]) -> Result<(), RepoError> {
        let raw = serde_json::to_string(posts)
            .map_err(|e| RepoError::LocalStore(format!("Encoding failed: {}", e)))?;
        self.storage.set(POSTS_KEY, &raw).await?;
        Ok(())
    }
}

fn check_id(id: &str) -> Result<&str, RepoError> {
    let trimmed = id.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_control) {
        return Err(RepoError::InvalidIdentifier(id.to_string()));
    }
    Ok(trimmed)
}

/// A timestamp-derived id not yet used by `posts`.
fn next_id(posts: &[Post]) -> String {
    let mut candidate = Utc::now().timestamp_millis();
    while posts.iter().any(|p| p.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[async_trait]
impl PostRepository for LocalPostRepository {
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        Ok(filter.select(self.load().await?))
    }

    async fn create(&self, draft: PostDraft) -> Result<Post, RepoError> {
        let new = draft.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut posts = self.load().await?;
        let post = Post::create(new, next_id(&posts), 0);

        posts.insert(0, post.clone());
        self.store(&posts).await?;
        Ok(post)
    }

    async fn read_and_count_view(&self, id: &str) -> Result<Post, RepoError> {
        let id = check_id(id)?;

        let _guard = self.write_lock.lock().await;
        let mut posts = self.load().await?;
        let stored = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;

        let before = stored.clone();
        stored.views += 1;
        self.store(&posts).await?;
        Ok(before)
    }

    async fn update(&self, id: &str, patch: PostDraft) -> Result<Post, RepoError> {
        let id = check_id(id)?;

        let _guard = self.write_lock.lock().await;
        let mut posts = self.load().await?;
        let stored = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;

        let updated = stored.apply(patch)?;
        *stored = updated.clone();
        self.store(&posts).await?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let id = check_id(id)?;

        let _guard = self.write_lock.lock().await;
        let mut posts = self.load().await?;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Err(RepoError::NotFound);
        }

        self.store(&posts).await
    }
}
