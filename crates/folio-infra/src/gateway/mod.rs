//! Client data gateway: one CRUD surface over a remote and a local store.
//!
//! Each call runs against the remote repository under a timeout. A transport
//! failure moves the call to the local repository. So does an identifier the
//! remote rejects as malformed on read, update and delete, since such an id
//! can only have been issued by the local store. Validation and not-found
//! errors from the remote are returned unchanged. Results say which store
//! served them.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use folio_core::domain::{Post, PostDraft, PostFilter};
use folio_core::error::RepoError;
use folio_core::ports::PostRepository;

/// Default bound on the remote attempt.
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the API is expected to live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentMode {
    /// API reachable; try it first.
    #[default]
    ServerBacked,
    /// Static hosting; the API is assumed absent.
    Static,
}

impl DeploymentMode {
    /// `DEPLOY_TARGET=GH_PAGES` or `BUILD_MODE=static` means static hosting.
    pub fn detect(deploy_target: Option<&str>, build_mode: Option<&str>) -> Self {
        let static_hosting = deploy_target.is_some_and(|t| t.eq_ignore_ascii_case("GH_PAGES"))
            || build_mode.is_some_and(|m| m.eq_ignore_ascii_case("static"));

        if static_hosting {
            DeploymentMode::Static
        } else {
            DeploymentMode::ServerBacked
        }
    }
}

/// The store that satisfied a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Remote,
    Local,
}

/// A result tagged with its [`Source`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Served<T> {
    pub data: T,
    pub source: Source,
}

impl<T> Served<T> {
    pub fn remote(data: T) -> Self {
        Self {
            data,
            source: Source::Remote,
        }
    }

    pub fn local(data: T) -> Self {
        Self {
            data,
            source: Source::Local,
        }
    }

    pub fn is_local(&self) -> bool {
        self.source == Source::Local
    }
}

/// Run `call`, turning an elapsed `limit` into a transport failure.
pub async fn call_with_timeout<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, RepoError>>,
) -> Result<T, RepoError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(RepoError::Transport(format!(
            "No answer within {} ms",
            limit.as_millis()
        ))),
    }
}

/// Remote failures that send a call to the local store.
#[derive(Debug, Clone, Copy)]
enum Fallback {
    OnTransport,
    /// Also an id the remote rejects as malformed.
    OnTransportOrForeignId,
}

/// Post gateway for the presentation layer.
pub struct PostGateway {
    remote: Option<Arc<dyn PostRepository>>,
    local: Arc<dyn PostRepository>,
    mode: DeploymentMode,
    remote_timeout: Duration,
}

impl PostGateway {
    pub fn new(remote: Arc<dyn PostRepository>, local: Arc<dyn PostRepository>) -> Self {
        Self {
            remote: Some(remote),
            local,
            mode: DeploymentMode::ServerBacked,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    /// Gateway with no remote at all; every call goes to `local`.
    pub fn local_only(local: Arc<dyn PostRepository>) -> Self {
        Self {
            remote: None,
            local,
            mode: DeploymentMode::Static,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    pub fn with_mode(mut self, mode: DeploymentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    pub fn mode(&self) -> DeploymentMode {
        self.mode
    }

    fn remote(&self) -> Option<&Arc<dyn PostRepository>> {
        match self.mode {
            DeploymentMode::ServerBacked => self.remote.as_ref(),
            DeploymentMode::Static => None,
        }
    }

    /// Await `remote`; when `fallback` accepts its failure await `local`.
    ///
    /// `local` is only polled on fallback, so it has no effect otherwise.
    async fn with_fallback<T>(
        &self,
        operation: &'static str,
        fallback: Fallback,
        remote: impl Future<Output = Result<T, RepoError>>,
        local: impl Future<Output = Result<T, RepoError>>,
    ) -> Result<Served<T>, RepoError> {
        let err = match call_with_timeout(self.remote_timeout, remote).await {
            Ok(data) => return Ok(Served::remote(data)),
            Err(e) => e,
        };

        match (&err, fallback) {
            (RepoError::Transport(reason), _) => {
                tracing::warn!(operation, %reason, "API unavailable, using local storage");
            }
            (RepoError::InvalidIdentifier(id), Fallback::OnTransportOrForeignId) => {
                tracing::debug!(operation, %id, "Id not issued by the API, using local storage");
            }
            _ => return Err(err),
        }

        local.await.map(Served::local).inspect_err(|e| {
            tracing::error!(operation, error = %e, "Local storage fallback failed");
        })
    }

    pub async fn list(&self, filter: &PostFilter) -> Result<Served<Vec<Post>>, RepoError> {
        match self.remote() {
            Some(remote) => {
                self.with_fallback(
                    "list",
                    Fallback::OnTransport,
                    remote.list(filter),
                    self.local.list(filter),
                )
                .await
            }
            None => self.local.list(filter).await.map(Served::local),
        }
    }

    pub async fn create(&self, draft: PostDraft) -> Result<Served<Post>, RepoError> {
        match self.remote() {
            Some(remote) => {
                self.with_fallback(
                    "create",
                    Fallback::OnTransport,
                    remote.create(draft.clone()),
                    self.local.create(draft),
                )
                .await
            }
            None => self.local.create(draft).await.map(Served::local),
        }
    }

    /// Read one post, counting a view in whichever store served it.
    pub async fn read(&self, id: &str) -> Result<Served<Post>, RepoError> {
        match self.remote() {
            Some(remote) => {
                self.with_fallback(
                    "read",
                    Fallback::OnTransportOrForeignId,
                    remote.read_and_count_view(id),
                    self.local.read_and_count_view(id),
                )
                .await
            }
            None => self.local.read_and_count_view(id).await.map(Served::local),
        }
    }

    pub async fn update(&self, id: &str, patch: PostDraft) -> Result<Served<Post>, RepoError> {
        match self.remote() {
            Some(remote) => {
                self.with_fallback(
                    "update",
                    Fallback::OnTransportOrForeignId,
                    remote.update(id, patch.clone()),
                    self.local.update(id, patch),
                )
                .await
            }
            None => self.local.update(id, patch).await.map(Served::local),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<Served<()>, RepoError> {
        match self.remote() {
            Some(remote) => {
                self.with_fallback(
                    "delete",
                    Fallback::OnTransportOrForeignId,
                    remote.delete(id),
                    self.local.delete(id),
                )
                .await
            }
            None => self.local.delete(id).await.map(Served::local),
        }
    }
}
