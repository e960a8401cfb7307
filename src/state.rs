use std::sync::Arc;
use tracing::{info, warn};

use crate::cache::ResponseCache;
use crate::config::Config;
use crate::db::Store;
use crate::services::{MovieService, SeaOrmMovieService};

/// Services built once at startup and shared by every request.
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub movie_service: Arc<dyn MovieService>,

    pub response_cache: Arc<ResponseCache>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let movie_service =
            Arc::new(SeaOrmMovieService::new(Arc::new(store.clone()))) as Arc<dyn MovieService>;

        Ok(Self::with_movie_service(config, store, movie_service))
    }

    /// Wires the state around an already-built [`MovieService`].
    #[must_use]
    pub fn with_movie_service(
        config: Config,
        store: Store,
        movie_service: Arc<dyn MovieService>,
    ) -> Self {
        let response_cache = Arc::new(ResponseCache::new(config.cache.server_ttl()));

        info!(
            enabled = config.cache.enabled,
            server_ttl_secs = config.cache.server_timeout_seconds,
            client_max_age_secs = config.cache.client_timeout_seconds,
            "Response cache initialized"
        );

        Self {
            config,
            store,
            movie_service,
            response_cache,
        }
    }

    pub async fn shutdown(&self) {
        let entries = self.response_cache.len();
        self.response_cache.clear();
        info!(entries, "Response cache cleared");

        if let Err(e) = self.store.conn.clone().close().await {
            warn!("Failed to close database pool: {}", e);
        }
    }
}
