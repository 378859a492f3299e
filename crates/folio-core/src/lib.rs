//! # Folio Core
//!
//! The domain layer of the Folio blog backend.
//! This crate contains the post model, its validation rules and the
//! repository ports. It has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{FieldViolation, RepoError, ValidationError};
