//! Domain-level error types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every constraint a post submission violated.
///
/// Displays as the violation messages joined with `", "`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![FieldViolation::new(field, message)])
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }

    /// True when some violation concerns `field`.
    pub fn mentions(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.violations {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(&violation.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Blog post not found")]
    NotFound,

    #[error("Invalid post ID: {0}")]
    InvalidIdentifier(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The remote store could not be reached or did not answer with JSON.
    #[error("Remote store unavailable: {0}")]
    Transport(String),

    #[error("Local storage failed: {0}")]
    LocalStore(String),
}

impl RepoError {
    pub fn is_transport(&self) -> bool {
        matches!(self, RepoError::Transport(_))
    }
}
