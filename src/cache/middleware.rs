//! Response cache hooks and the middleware that runs them.
//!
//! Fixed order per request: [`try_serve_from_cache`], then the handler on a
//! miss, then [`maybe_cache`], then [`stamp_cache_control`]. Only query-less
//! `GET` requests are looked up or stored, because the key is the path alone.
//!
//! [`response_cache_layer`] wraps the cacheable routes. [`cache_control_layer`]
//! wraps the whole router so the header reaches every response.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{OriginalUri, Request, State},
    http::{HeaderValue, Method, StatusCode, Uri, header},
    middleware::Next,
    response::Response,
};
use bytes::BytesMut;
use futures::StreamExt;
use tracing::{debug, instrument, warn};

use super::store::{CachedResponse, ResponseCache};
use crate::config::CacheConfig;
use crate::constants::cache::MAX_CACHED_BODY_BYTES;

/// Marks a response that was rebuilt from a stored entry.
#[derive(Debug, Clone, Copy)]
pub struct ServedFromCache;

/// Shared state for [`response_cache_layer`].
#[derive(Clone)]
pub struct CacheState {
    pub store: Arc<ResponseCache>,
    pub enabled: bool,
    cache_control: HeaderValue,
}

impl CacheState {
    #[must_use]
    pub fn new(store: Arc<ResponseCache>, config: &CacheConfig) -> Self {
        Self {
            store,
            enabled: config.enabled,
            cache_control: cache_control_value(config.client_timeout_seconds),
        }
    }
}

fn cache_control_value(max_age: u64) -> HeaderValue {
    HeaderValue::from_str(&format!("max-age={max_age}"))
        .unwrap_or_else(|_| HeaderValue::from_static("no-cache"))
}

/// What the post-response hook needs from a request the handler has already
/// consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheableRequest {
    key: Option<String>,
}

impl CacheableRequest {
    #[must_use]
    pub fn from_request(request: &Request, enabled: bool) -> Self {
        let eligible =
            enabled && request.method() == Method::GET && !has_query_params(request.uri());

        // Under `Router::nest` the visible URI has the prefix stripped.
        let path = request
            .extensions()
            .get::<OriginalUri>()
            .map_or_else(|| request.uri().path(), |original| original.0.path());

        Self {
            key: eligible.then(|| path.to_string()),
        }
    }

    /// The path key, or `None` when the request must bypass the cache.
    #[must_use]
    pub fn cache_key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

fn has_query_params(uri: &Uri) -> bool {
    uri.query().is_some_and(|q| !q.is_empty())
}

/// Pre-request hook. Returns the stored response for a query-less request
/// whose entry is still fresh.
#[must_use]
pub fn try_serve_from_cache(cache: &ResponseCache, request: &CacheableRequest) -> Option<Response> {
    let Some(key) = request.cache_key() else {
        metrics::counter!("response_cache_lookups_total", "outcome" => "bypass").increment(1);
        return None;
    };

    if let Some(cached) = cache.get(key) {
        debug!(cache = "response", outcome = "hit", "serving cached response");
        metrics::counter!("response_cache_lookups_total", "outcome" => "hit").increment(1);
        return Some(build_response(cached));
    }

    debug!(
        cache = "response",
        outcome = "miss",
        "cache miss, executing handler"
    );
    metrics::counter!("response_cache_lookups_total", "outcome" => "miss").increment(1);
    None
}

/// Post-response hook. Stores a `200 OK` response for a query-less request
/// under its path; everything else passes through untouched.
pub async fn maybe_cache(
    cache: &ResponseCache,
    request: &CacheableRequest,
    response: Response,
) -> Response {
    let Some(key) = request.cache_key() else {
        return response;
    };

    if response.status() != StatusCode::OK
        || response.extensions().get::<ServedFromCache>().is_some()
    {
        return response;
    }

    let (parts, body) = response.into_parts();

    let within_limit = body
        .size_hint()
        .exact()
        .is_some_and(|len| len <= MAX_CACHED_BODY_BYTES as u64);
    if !within_limit {
        debug!(cache = "response", key, "body length unknown or too large, not caching");
        return Response::from_parts(parts, body);
    }

    let bytes = match buffer_body(body, MAX_CACHED_BODY_BYTES).await {
        Ok(b) => b,
        Err(replay) => {
            warn!(cache = "response", key, "response body could not be buffered, not caching");
            return Response::from_parts(parts, replay);
        }
    };

    let cached = CachedResponse {
        status: parts.status,
        content_type: parts.headers.get(header::CONTENT_TYPE).cloned(),
        body: bytes.clone(),
    };

    debug!(cache = "response", key, bytes = bytes.len(), "caching response");
    metrics::counter!("response_cache_stores_total").increment(1);
    cache.insert(key, cached);

    Response::from_parts(parts, Body::from(bytes))
}

/// Reads `body` to the end if it fits in `limit` bytes.
///
/// On a stream error or an oversized body, returns a body that yields the
/// chunks already read and then the rest of the stream, error included.
async fn buffer_body(body: Body, limit: usize) -> Result<Bytes, Body> {
    let mut stream = body.into_data_stream();
    let mut buffered = BytesMut::new();

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(data) if buffered.len() + data.len() <= limit => buffered.extend_from_slice(&data),
            unread => {
                let replay = futures::stream::iter([Ok(buffered.freeze()), unread]).chain(stream);
                return Err(Body::from_stream(replay));
            }
        }
    }

    Ok(buffered.freeze())
}

/// Client-cache hook. Applies `max-age` to every response.
#[must_use]
pub fn stamp_cache_control(mut response: Response, value: &HeaderValue) -> Response {
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, value.clone());
    response
}

fn build_response(cached: CachedResponse) -> Response {
    let mut response = Response::new(Body::from(cached.body));
    *response.status_mut() = cached.status;
    if let Some(content_type) = cached.content_type {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
    }
    response.extensions_mut().insert(ServedFromCache);
    response
}

/// Runs the lookup and store hooks around the routes it wraps.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn response_cache_layer(
    State(cache): State<CacheState>,
    request: Request,
    next: Next,
) -> Response {
    let cacheable = CacheableRequest::from_request(&request, cache.enabled);

    let response = match try_serve_from_cache(&cache.store, &cacheable) {
        Some(hit) => hit,
        None => next.run(request).await,
    };

    maybe_cache(&cache.store, &cacheable, response).await
}

/// Stamps `Cache-Control` once the inner stack, including any
/// [`response_cache_layer`], has produced the response.
pub async fn cache_control_layer(
    State(cache): State<CacheState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    stamp_cache_control(response, &cache.cache_control)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;
    use std::time::Duration;

    fn get(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn cache() -> ResponseCache {
        ResponseCache::new(Duration::from_secs(60))
    }

    async fn body_bytes(response: Response) -> bytes::Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[test]
    fn test_key_is_path_only() {
        let req = CacheableRequest::from_request(&get("/api/v1/movies/4"), true);
        assert_eq!(req.cache_key(), Some("/api/v1/movies/4"));
    }

    #[test]
    fn test_query_params_bypass() {
        let req = CacheableRequest::from_request(&get("/api/v1/movies?title=Greed"), true);
        assert_eq!(req.cache_key(), None);
    }

    #[test]
    fn test_empty_query_string_is_cacheable() {
        let req = CacheableRequest::from_request(&get("/api/v1/movies?"), true);
        assert_eq!(req.cache_key(), Some("/api/v1/movies"));
    }

    #[test]
    fn test_non_get_and_disabled_bypass() {
        let post = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/movies")
            .body(Body::empty())
            .unwrap();
        assert_eq!(CacheableRequest::from_request(&post, true).cache_key(), None);
        assert_eq!(
            CacheableRequest::from_request(&get("/api/v1/movies"), false).cache_key(),
            None
        );
    }

    #[test]
    fn test_query_request_never_looks_up() {
        let cache = cache();
        cache.insert(
            "/api/v1/movies",
            CachedResponse {
                status: StatusCode::OK,
                content_type: None,
                body: bytes::Bytes::from_static(b"stale"),
            },
        );

        let req = CacheableRequest::from_request(&get("/api/v1/movies?year=1924"), true);
        assert!(try_serve_from_cache(&cache, &req).is_none());
    }

    #[tokio::test]
    async fn test_ok_response_is_stored_verbatim() {
        let cache = cache();
        let req = CacheableRequest::from_request(&get("/api/v1/titles"), true);

        let response = Json(serde_json::json!({ "titles": ["Greed"] })).into_response();
        let response = maybe_cache(&cache, &req, response).await;
        let sent = body_bytes(response).await;

        let hit = try_serve_from_cache(&cache, &req).unwrap();
        assert_eq!(hit.status(), StatusCode::OK);
        assert_eq!(
            hit.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert!(hit.extensions().get::<ServedFromCache>().is_some());
        assert_eq!(body_bytes(hit).await, sent);
    }

    #[tokio::test]
    async fn test_non_ok_response_is_not_stored() {
        let cache = cache();
        let req = CacheableRequest::from_request(&get("/api/v1/movies/9999"), true);

        let response = maybe_cache(&cache, &req, StatusCode::NOT_FOUND.into_response()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(cache.is_empty());

        let created = (StatusCode::CREATED, "x").into_response();
        let _ = maybe_cache(&cache, &req, created).await;
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_query_request_is_not_stored() {
        let cache = cache();
        let req = CacheableRequest::from_request(&get("/api/v1/movies?title=Greed"), true);

        let _ = maybe_cache(&cache, &req, Json(serde_json::json!({})).into_response()).await;
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_served_from_cache_is_not_stored_again() {
        let cache = cache();
        let req = CacheableRequest::from_request(&get("/api/v1/titles"), true);

        let mut replay = Json(serde_json::json!({ "titles": [] })).into_response();
        replay.extensions_mut().insert(ServedFromCache);

        let response = maybe_cache(&cache, &req, replay).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(cache.is_empty());
    }

    fn failing_body() -> Body {
        let chunks: [Result<&'static str, std::io::Error>; 2] = [
            Ok(r#"{"movies":["#),
            Err(std::io::Error::other("connection reset")),
        ];
        Body::from_stream(futures::stream::iter(chunks))
    }

    #[tokio::test]
    async fn test_buffer_body_reads_whole_body() {
        let body = Body::from(r#"{"titles":["Greed"]}"#);
        let bytes = buffer_body(body, MAX_CACHED_BODY_BYTES).await.unwrap();
        assert_eq!(bytes, r#"{"titles":["Greed"]}"#.as_bytes());
    }

    #[tokio::test]
    async fn test_buffer_body_replays_read_chunks_then_error() {
        let Err(replay) = buffer_body(failing_body(), MAX_CACHED_BODY_BYTES).await else {
            panic!("stream error must not buffer");
        };

        let mut stream = replay.into_data_stream();
        let mut seen = BytesMut::new();
        let mut failed = false;
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(data) => seen.extend_from_slice(&data),
                Err(_) => failed = true,
            }
        }
        assert_eq!(&seen[..], br#"{"movies":["#);
        assert!(failed);
    }

    #[tokio::test]
    async fn test_buffer_body_over_limit_passes_everything_through() {
        let body = Body::from_stream(futures::stream::iter([
            Ok::<_, std::io::Error>("abc"),
            Ok("def"),
        ]));
        let Err(replay) = buffer_body(body, 4).await else {
            panic!("oversized body must not buffer");
        };
        assert_eq!(body_bytes(replay.into_response()).await, "abcdef".as_bytes());
    }

    #[test]
    fn test_stamp_cache_control_overwrites() {
        let mut response = StatusCode::NOT_FOUND.into_response();
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

        let response = stamp_cache_control(response, &cache_control_value(300));
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "max-age=300"
        );
    }
}
