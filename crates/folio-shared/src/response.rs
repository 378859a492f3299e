//! Standardized API response envelopes.
//!
//! Every body carries a `success` flag; clients branch on it rather than on
//! the HTTP status alone.

use serde::{Deserialize, Serialize};

/// Standard successful API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            message: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            message: Some(message.into()),
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(items.len()),
            data: Some(items),
            message: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            count: None,
            message: Some(message.into()),
        }
    }
}

/// Machine-readable failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    InvalidIdentifier,
    NotFound,
    BadRequest,
    Internal,
}

impl ErrorCode {
    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        match self {
            ErrorCode::Validation | ErrorCode::InvalidIdentifier | ErrorCode::BadRequest => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::Internal => 500,
        }
    }
}

/// One violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

/// Failure envelope: `{success: false, error, code, violations?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,

    /// A human-readable explanation of this failure.
    pub error: String,

    pub code: ErrorCode,

    /// Every violated constraint, for validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code,
            violations: Vec::new(),
        }
    }

    pub fn status(&self) -> u16 {
        self.code.status()
    }

    // Common error constructors
    pub fn validation(violations: Vec<Violation>) -> Self {
        let error = violations
            .iter()
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            violations,
            ..Self::new(ErrorCode::Validation, error)
        }
    }

    pub fn invalid_identifier() -> Self {
        Self::new(ErrorCode::InvalidIdentifier, "Invalid post ID")
    }

    pub fn not_found() -> Self {
        Self::new(ErrorCode::NotFound, "Blog post not found")
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, detail)
    }
}
