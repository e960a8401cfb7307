use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::cache::{CacheState, ResponseCache, cache_control_layer, response_cache_layer};
use crate::config::Config;
use crate::constants::API_PREFIX;
use crate::services::MovieService;
use crate::state::SharedState;

mod error;
mod movies;
mod observability;
mod system;
mod titles;
pub mod types;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn movie_service(&self) -> &Arc<dyn MovieService> {
        &self.shared.movie_service
    }

    #[must_use]
    pub fn response_cache(&self) -> &Arc<ResponseCache> {
        &self.shared.response_cache
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let config = state.config();

    let cache_state = CacheState::new(state.response_cache().clone(), &config.cache);

    let cors_layer = if config.server.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .server
            .cors_allowed_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };

    let api_router = create_movie_router()
        .layer(middleware::from_fn_with_state(
            cache_state.clone(),
            response_cache_layer,
        ))
        .route("/health/live", get(system::health_live))
        .route("/health/ready", get(system::health_ready))
        .with_state(state.clone());

    Router::new()
        .nest(API_PREFIX, api_router)
        .route("/metrics", get(observability::get_metrics))
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            cache_state,
            cache_control_layer,
        ))
        .layer(
            cors_layer
                .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
                .expose_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

/// Read-only movie routes, all behind the response cache.
fn create_movie_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(movies::list_movies))
        .route("/movies/{id}", get(movies::get_movie))
        .route("/titles", get(titles::list_titles))
}
