//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{PasswordService, TokenService};
use blog_core::{BlogService, Repositories};
use blog_infra::{Argon2PasswordService, InMemoryBlogStore, JwtTokenService};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    /// Name of the storage backend in use, reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (repos, storage) = Self::repositories(config).await;

        tracing::info!(storage, "Application state initialized");

        Self::with_repositories(
            repos,
            storage,
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            Arc::new(Argon2PasswordService::new()),
        )
    }

    pub fn with_repositories(
        repos: Repositories,
        storage: &'static str,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            blog: BlogService::new(repos),
            tokens,
            passwords,
            storage,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> (Repositories, &'static str) {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return (InMemoryBlogStore::new().repositories(), "memory");
        };

        match blog_infra::database::connect(db_config).await {
            Ok(conn) => (blog_infra::postgres_repositories(conn), "postgres"),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                (InMemoryBlogStore::new().repositories(), "memory")
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> (Repositories, &'static str) {
        tracing::info!("Running without postgres feature - using in-memory store");
        (InMemoryBlogStore::new().repositories(), "memory")
    }
}
