//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod local_storage;
mod repository;

pub use local_storage::{LocalStorage, StorageError};
pub use repository::PostRepository;
