//! End-to-end behavior of the response cache through the full router.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Router,
    body::{Body, Bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use sfmovies::api::{AppState, MovieDto};
use sfmovies::config::Config;
use sfmovies::db::Store;
use sfmovies::domain::MovieId;
use sfmovies::models::movie::MovieFilter;
use sfmovies::services::{MovieError, MovieService, SeaOrmMovieService};
use sfmovies::state::SharedState;
use tower::ServiceExt;

/// Delegates to the real service and counts how often the store is reached.
struct CountingMovieService {
    inner: SeaOrmMovieService,
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl MovieService for CountingMovieService {
    async fn list_movies(&self, filter: &MovieFilter) -> Result<Vec<MovieDto>, MovieError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_movies(filter).await
    }

    async fn get_movie(&self, id: MovieId) -> Result<MovieDto, MovieError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_movie(id).await
    }

    async fn list_distinct_titles(&self) -> Result<Vec<String>, MovieError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_distinct_titles().await
    }
}

struct UnavailableMovieService;

#[async_trait::async_trait]
impl MovieService for UnavailableMovieService {
    async fn list_movies(&self, _filter: &MovieFilter) -> Result<Vec<MovieDto>, MovieError> {
        Err(MovieError::Unavailable("pool timed out".to_string()))
    }

    async fn get_movie(&self, _id: MovieId) -> Result<MovieDto, MovieError> {
        Err(MovieError::Unavailable("pool timed out".to_string()))
    }

    async fn list_distinct_titles(&self) -> Result<Vec<String>, MovieError> {
        Err(MovieError::Unavailable("pool timed out".to_string()))
    }
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config
}

async fn spawn_counting_app(config: Config) -> (Arc<AppState>, Router, Arc<AtomicUsize>) {
    let store = Store::new(&config.general.database_path)
        .await
        .expect("failed to open store");

    let calls = Arc::new(AtomicUsize::new(0));
    let service = CountingMovieService {
        inner: SeaOrmMovieService::new(Arc::new(store.clone())),
        calls: Arc::clone(&calls),
    };

    let shared = SharedState::with_movie_service(config, store, Arc::new(service));
    let state = sfmovies::api::create_app_state(Arc::new(shared), None);
    let router = sfmovies::api::router(state.clone());
    (state, router, calls)
}

async fn send(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn cache_control(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn test_repeat_request_is_served_from_cache() {
    let (state, app, calls) = spawn_counting_app(test_config()).await;

    let first = send(&app, "/api/v1/titles").await;
    assert_eq!(first.status(), StatusCode::OK);
    let first_body = body_bytes(first).await;

    let second = send(&app, "/api/v1/titles").await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(
        second.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let second_body = body_bytes(second).await;

    assert_eq!(first_body, second_body);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(state.response_cache().contains("/api/v1/titles"));
}

#[tokio::test]
async fn test_cache_key_includes_api_prefix() {
    let (state, app, _) = spawn_counting_app(test_config()).await;

    let response = send(&app, "/api/v1/movies").await;
    assert_eq!(response.status(), StatusCode::OK);

    assert!(state.response_cache().contains("/api/v1/movies"));
    assert!(!state.response_cache().contains("/movies"));
    assert_eq!(state.response_cache().len(), 1);
}

#[tokio::test]
async fn test_repeat_get_movie_returns_identical_json() {
    let (state, app, calls) = spawn_counting_app(test_config()).await;

    let first = send(&app, "/api/v1/movies/3").await;
    assert_eq!(first.status(), StatusCode::OK);
    let first_body = body_bytes(first).await;

    let second = send(&app, "/api/v1/movies/3").await;
    assert_eq!(second.status(), StatusCode::OK);
    let second_body = body_bytes(second).await;

    assert_eq!(first_body, second_body);
    let json: serde_json::Value = serde_json::from_slice(&second_body).unwrap();
    assert_eq!(json["movie"]["id"], 3);
    assert_eq!(json["movie"]["title"], "The Ten Commandments");

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(state.response_cache().contains("/api/v1/movies/3"));
}

#[tokio::test]
async fn test_paths_are_cached_independently() {
    let (state, app, calls) = spawn_counting_app(test_config()).await;

    send(&app, "/api/v1/movies/1").await;
    send(&app, "/api/v1/movies/2").await;
    send(&app, "/api/v1/movies/1").await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(state.response_cache().len(), 2);
}

#[tokio::test]
async fn test_query_requests_bypass_cache() {
    let (state, app, calls) = spawn_counting_app(test_config()).await;

    for _ in 0..3 {
        let response = send(&app, "/api/v1/movies?title=Greed").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(cache_control(&response), Some("max-age=300"));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(state.response_cache().is_empty());
}

#[tokio::test]
async fn test_query_request_ignores_stored_entry() {
    let (_, app, calls) = spawn_counting_app(test_config()).await;

    let all = body_bytes(send(&app, "/api/v1/movies").await).await;
    let filtered = body_bytes(send(&app, "/api/v1/movies?title=Greed").await).await;

    assert_ne!(all, filtered);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_not_found_is_not_cached() {
    let (state, app, calls) = spawn_counting_app(test_config()).await;

    for _ in 0..2 {
        let response = send(&app, "/api/v1/movies/9999").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(cache_control(&response), Some("max-age=300"));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(state.response_cache().is_empty());
}

#[tokio::test]
async fn test_unavailable_store_is_not_cached() {
    let config = test_config();
    let store = Store::new(&config.general.database_path).await.unwrap();
    let shared = SharedState::with_movie_service(config, store, Arc::new(UnavailableMovieService));
    let state = sfmovies::api::create_app_state(Arc::new(shared), None);
    let app = sfmovies::api::router(state.clone());

    let response = send(&app, "/api/v1/movies").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(cache_control(&response), Some("max-age=300"));

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(body["error"].is_string());
    assert!(state.response_cache().is_empty());
}

#[tokio::test]
async fn test_expired_entry_is_recomputed() {
    let mut config = test_config();
    config.cache.server_timeout_seconds = 0;
    let (_, app, calls) = spawn_counting_app(config).await;

    send(&app, "/api/v1/titles").await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    send(&app, "/api/v1/titles").await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_cache_control_on_every_response() {
    let (_, app, _) = spawn_counting_app(test_config()).await;

    for uri in [
        "/api/v1/movies",
        "/api/v1/movies",
        "/api/v1/movies/3",
        "/api/v1/titles",
        "/api/v1/movies/9999",
        "/api/v1/movies?year=bad",
    ] {
        let response = send(&app, uri).await;
        assert_eq!(cache_control(&response), Some("max-age=300"), "{uri}");
    }
}

#[tokio::test]
async fn test_client_max_age_is_configurable() {
    let mut config = test_config();
    config.cache.client_timeout_seconds = 42;
    let (_, app, _) = spawn_counting_app(config).await;

    let response = send(&app, "/api/v1/titles").await;
    assert_eq!(cache_control(&response), Some("max-age=42"));
}

#[tokio::test]
async fn test_disabled_cache_still_sets_header() {
    let mut config = test_config();
    config.cache.enabled = false;
    let (state, app, calls) = spawn_counting_app(config).await;

    for _ in 0..2 {
        let response = send(&app, "/api/v1/titles").await;
        assert_eq!(cache_control(&response), Some("max-age=300"));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(state.response_cache().is_empty());
}

#[tokio::test]
async fn test_concurrent_misses_leave_one_entry() {
    let (state, app, _) = spawn_counting_app(test_config()).await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move { body_bytes(send(&app, "/api/v1/movies").await).await })
        })
        .collect();

    let mut bodies = Vec::new();
    for handle in handles {
        bodies.push(handle.await.unwrap());
    }

    assert!(bodies.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(state.response_cache().len(), 1);
}
