//! HTTP client for the blog post API.
//!
//! Anything that keeps the API from answering with a JSON envelope (network
//! errors, timeouts, HTML error pages, 5xx responses) becomes
//! [`RepoError::Transport`]. Application failures decode back into the
//! matching [`RepoError`] variant.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use folio_core::domain::{Post, PostDraft, PostFilter};
use folio_core::error::{FieldViolation, RepoError, ValidationError};
use folio_core::ports::PostRepository;
use folio_shared::dto::ListPostsQuery;
use folio_shared::{ApiResponse, ErrorCode, ErrorResponse};

/// Default bound on a single API call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Remote API client configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the server, without the `/api` suffix.
    pub base_url: String,
    pub timeout: Duration,
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Post repository backed by the HTTP API.
pub struct HttpPostRepository {
    client: Client,
    base_url: String,
}

impl HttpPostRepository {
    pub fn new(config: RemoteConfig) -> Result<Self, RepoError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RepoError::Transport(format!("Client setup failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/api{}", self.base_url, path))
    }

    fn post_path(id: &str) -> Result<String, RepoError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RepoError::InvalidIdentifier(id.to_string()));
        }
        Ok(format!("/posts/{}", id))
    }

    /// Send `request` and decode the envelope's `data`.
    async fn call<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        id: Option<&str>,
    ) -> Result<Option<T>, RepoError> {
        let response = request
            .send()
            .await
            .map_err(|e| RepoError::Transport(e.to_string()))?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));
        if !is_json {
            return Err(RepoError::Transport(format!(
                "API not available (status {}, non-JSON response)",
                status
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RepoError::Transport(e.to_string()))?;
        let value: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| RepoError::Transport(format!("Malformed JSON response: {}", e)))?;

        if value.get("success").and_then(serde_json::Value::as_bool) == Some(true) {
            let envelope: ApiResponse<T> = serde_json::from_value(value)
                .map_err(|e| RepoError::Transport(format!("Unexpected response shape: {}", e)))?;
            return Ok(envelope.data);
        }

        if status.is_server_error() {
            return Err(RepoError::Transport(format!("Server error (status {})", status)));
        }

        let error: ErrorResponse = serde_json::from_value(value)
            .map_err(|e| RepoError::Transport(format!("Unexpected error shape: {}", e)))?;
        Err(decode_error(error, id))
    }

    async fn call_for_post(
        &self,
        request: RequestBuilder,
        id: Option<&str>,
    ) -> Result<Post, RepoError> {
        self.call::<Post>(request, id)
            .await?
            .ok_or_else(|| RepoError::Transport("Response carried no post".to_string()))
    }
}

fn decode_error(error: ErrorResponse, id: Option<&str>) -> RepoError {
    match error.code {
        ErrorCode::NotFound => RepoError::NotFound,
        ErrorCode::InvalidIdentifier => {
            RepoError::InvalidIdentifier(id.unwrap_or_default().to_string())
        }
        ErrorCode::Validation if !error.violations.is_empty() => {
            RepoError::Validation(ValidationError::new(
                error
                    .violations
                    .into_iter()
                    .map(|v| FieldViolation::new(v.field, v.message))
                    .collect(),
            ))
        }
        ErrorCode::Validation | ErrorCode::BadRequest => {
            RepoError::Validation(ValidationError::single("body", error.error))
        }
        ErrorCode::Internal => RepoError::Transport(error.error),
    }
}

#[async_trait]
impl PostRepository for HttpPostRepository {
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let query = ListPostsQuery {
            category: filter.category().map(str::to_string),
            search: filter.search().map(str::to_string),
            featured: filter.is_featured_only().then(|| "true".to_string()),
        };
        let request = self.request(Method::GET, "/posts").query(&query);

        Ok(self.call::<Vec<Post>>(request, None).await?.unwrap_or_default())
    }

    async fn create(&self, draft: PostDraft) -> Result<Post, RepoError> {
        let request = self.request(Method::POST, "/posts").json(&draft);
        self.call_for_post(request, None).await
    }

    async fn read_and_count_view(&self, id: &str) -> Result<Post, RepoError> {
        let request = self.request(Method::GET, &Self::post_path(id)?);
        self.call_for_post(request, Some(id)).await
    }

    async fn update(&self, id: &str, patch: PostDraft) -> Result<Post, RepoError> {
        let request = self.request(Method::PUT, &Self::post_path(id)?).json(&patch);
        self.call_for_post(request, Some(id)).await
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let request = self.request(Method::DELETE, &Self::post_path(id)?);
        self.call::<serde_json::Value>(request, Some(id)).await?;
        Ok(())
    }
}
