//! Application state - shared across all handlers.

use std::sync::Arc;

use folio_core::domain::ViewSeed;
use folio_core::ports::PostRepository;
use folio_infra::database::{DatabaseConfig, InMemoryPostRepository};

#[cfg(feature = "postgres")]
use folio_infra::database::{SeaOrmPostRepository, connect};

/// Which post store the server ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    InMemory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Postgres => "postgres",
            StoreKind::InMemory => "in-memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub store: StoreKind,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>, view_seed: ViewSeed) -> Self {
        #[cfg(feature = "postgres")]
        let state = match db_config {
            Some(config) => match connect(config).await {
                Ok(db) => Self {
                    posts: Arc::new(SeaOrmPostRepository::new(db).with_view_seed(view_seed)),
                    store: StoreKind::Postgres,
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory(view_seed)
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory(view_seed)
            }
        };

        #[cfg(not(feature = "postgres"))]
        let state = {
            let _ = db_config;
            tracing::info!("Running without postgres feature - using in-memory repository");
            Self::in_memory(view_seed)
        };

        tracing::info!(store = state.store.as_str(), "Application state initialized");
        state
    }

    pub fn in_memory(view_seed: ViewSeed) -> Self {
        Self::with_repository(
            Arc::new(InMemoryPostRepository::new().with_view_seed(view_seed)),
            StoreKind::InMemory,
        )
    }

    pub fn with_repository(posts: Arc<dyn PostRepository>, store: StoreKind) -> Self {
        Self { posts, store }
    }
}
