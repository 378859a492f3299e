//! # Folio Infrastructure
//!
//! Concrete implementations of the ports defined in `folio-core`: the
//! central post store, the client-side local store, the HTTP client for the
//! API, and the gateway that picks between them.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory and file storage only
//! - `postgres` - PostgreSQL post store via SeaORM
//! - `remote` - HTTP client for the blog API via reqwest

pub mod database;
pub mod gateway;
pub mod local;

#[cfg(feature = "remote")]
pub mod remote;

// Re-exports - always available
pub use database::{DatabaseConfig, InMemoryPostRepository};
pub use gateway::{DeploymentMode, PostGateway, Served, Source};
pub use local::{FileLocalStorage, InMemoryLocalStorage, LocalPostRepository};

#[cfg(feature = "postgres")]
pub use database::{SeaOrmPostRepository, connect};

#[cfg(feature = "remote")]
pub use remote::{HttpPostRepository, RemoteConfig};
