//! In-memory response store with lazy TTL expiry.

use std::time::{Duration, Instant};

use axum::http::{HeaderValue, StatusCode};
use bytes::Bytes;
use dashmap::DashMap;
use tracing::debug;

/// A fully-buffered response as it left the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

#[derive(Debug)]
struct CacheEntry {
    response: CachedResponse,
    created: Instant,
    ttl: Duration,
}

impl CacheEntry {
    /// Valid while `now - created <= ttl`.
    fn is_fresh_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) <= self.ttl
    }
}

/// Process-wide response memo keyed by request path.
///
/// Entries are replaced whole on every insert. Expired entries are never
/// returned and are dropped when a lookup finds them; there is no sweeper.
#[derive(Debug)]
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ResponseCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<CachedResponse> {
        self.get_at(key, Instant::now())
    }

    #[must_use]
    pub fn get_at(&self, key: &str, now: Instant) -> Option<CachedResponse> {
        {
            let entry = self.entries.get(key)?;
            if entry.is_fresh_at(now) {
                return Some(entry.response.clone());
            }
        }

        // The read guard must be released before touching the shard again.
        if self
            .entries
            .remove_if(key, |_, entry| !entry.is_fresh_at(now))
            .is_some()
        {
            debug!(key, "Dropped expired cache entry");
        }
        None
    }

    pub fn insert(&self, key: impl Into<String>, response: CachedResponse) {
        self.insert_at(key, response, Instant::now());
    }

    pub fn insert_at(&self, key: impl Into<String>, response: CachedResponse, now: Instant) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                response,
                created: now,
                ttl: self.ttl,
            },
        );
    }

    /// Whether a lookup for `key` right now would hit.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries
            .get(key)
            .is_some_and(|entry| entry.is_fresh_at(now))
    }

    /// Number of stored entries, including expired ones not yet looked up.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
