//! Application configuration loaded from environment variables.

use std::env;

use folio_core::domain::ViewSeed;
use folio_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub view_seed: ViewSeed,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| DatabaseConfig {
                url,
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(100),
                min_connections: env::var("DB_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            });

        let view_seed = match env::var("INITIAL_VIEWS") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("Ignoring INITIAL_VIEWS: {}", e);
                ViewSeed::default()
            }),
            Err(_) => ViewSeed::default(),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            view_seed,
        }
    }
}
