//! Error handling - failures rendered as `{success: false, ...}` envelopes.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use folio_core::error::{RepoError, ValidationError};
use folio_shared::{ErrorResponse, Violation};

/// Application-level error type that converts to failure envelopes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(ValidationError),

    #[error("Invalid post ID")]
    InvalidIdentifier,

    #[error("Blog post not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// `public` is sent to the client, `detail` only logged.
    #[error("{public}: {detail}")]
    Internal { public: &'static str, detail: String },
}

impl AppError {
    pub fn internal(public: &'static str, detail: impl Into<String>) -> Self {
        AppError::Internal {
            public,
            detail: detail.into(),
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            AppError::Validation(err) => ErrorResponse::validation(
                err.violations()
                    .iter()
                    .map(|v| Violation {
                        field: v.field.clone(),
                        message: v.message.clone(),
                    })
                    .collect(),
            ),
            AppError::InvalidIdentifier => ErrorResponse::invalid_identifier(),
            AppError::NotFound => ErrorResponse::not_found(),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Internal { public, detail } => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal(*public)
            }
        }
    }

    /// Map a repository failure, naming the operation for 500 responses.
    pub fn from_repo(err: RepoError, operation: &'static str) -> Self {
        match err {
            RepoError::Validation(e) => AppError::Validation(e),
            RepoError::InvalidIdentifier(_) => AppError::InvalidIdentifier,
            RepoError::NotFound => AppError::NotFound,
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::internal(operation, msg)
            }
            other => AppError::internal(operation, other.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        AppError::from_repo(err, "Internal server error")
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidIdentifier | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}

/// Undecodable JSON bodies become 400 envelopes.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Undecodable query strings become 400 envelopes.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
