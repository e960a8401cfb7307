/// Every API route is nested under this prefix.
pub const API_PREFIX: &str = "/api/v1";

pub mod cache {

    pub const SERVER_CACHE_TIMEOUT_SECS: u64 = 60;

    pub const CLIENT_CACHE_TIMEOUT_SECS: u64 = 300;

    /// Responses with larger bodies are passed through without being stored.
    pub const MAX_CACHED_BODY_BYTES: usize = 1024 * 1024;
}
