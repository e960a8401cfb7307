//! Path-keyed HTTP response cache.
//!
//! [`ResponseCache`] holds the entries; [`middleware`] decides which requests
//! may read or populate it and stamps the client `Cache-Control` header.

pub mod middleware;
pub mod store;

pub use middleware::{
    CacheState, CacheableRequest, ServedFromCache, cache_control_layer, maybe_cache,
    response_cache_layer, stamp_cache_control, try_serve_from_cache,
};
pub use store::{CachedResponse, ResponseCache};
