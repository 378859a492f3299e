//! Central post store: PostgreSQL via SeaORM, plus an in-memory stand-in.

use folio_core::error::RepoError;
use uuid::Uuid;

mod connections;
mod memory;

#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod post_repo;

#[cfg(feature = "postgres")]
pub use connections::connect;
pub use connections::DatabaseConfig;
pub use memory::InMemoryPostRepository;

#[cfg(feature = "postgres")]
pub use post_repo::SeaOrmPostRepository;

/// Central-store ids are UUIDs; anything else is rejected before any lookup.
fn parse_id(id: &str) -> Result<Uuid, RepoError> {
    Uuid::parse_str(id).map_err(|_| RepoError::InvalidIdentifier(id.to_string()))
}

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
