use async_trait::async_trait;

use crate::domain::{Post, PostDraft, PostFilter};
use crate::error::RepoError;

/// Post repository - CRUD over whichever store holds the posts.
///
/// Identifiers are store-specific strings. A store rejects identifiers it
/// could never have issued with [`RepoError::InvalidIdentifier`].
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts matching `filter`, newest first.
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError>;

    /// Validate `draft` and store it under a fresh identifier.
    async fn create(&self, draft: PostDraft) -> Result<Post, RepoError>;

    /// Fetch a post and count one view.
    ///
    /// The returned post is the one read before the increment.
    async fn read_and_count_view(&self, id: &str) -> Result<Post, RepoError>;

    /// Merge `patch` into the stored post and re-validate it.
    async fn update(&self, id: &str, patch: PostDraft) -> Result<Post, RepoError>;

    async fn delete(&self, id: &str) -> Result<(), RepoError>;
}
