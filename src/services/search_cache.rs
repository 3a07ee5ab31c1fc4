//! Redis-backed cache for GET /search responses
//!
//! Keys embed a generation counter. Adding or deleting a selection bumps the
//! generation, which orphans every cached page at once; orphans expire by TTL.
//! Cache failures are logged and never fail a request.

use sha1::{Digest, Sha1};

use super::redis::RedisService;
use crate::models::{SearchFilter, SearchResults};

const GENERATION_KEY: &str = "search:generation";

/// Search cache; a no-op when no Redis URL is configured
#[derive(Clone)]
pub struct SearchCache {
    redis: Option<RedisService>,
    ttl_seconds: u64,
}

/// State of the cache, reported by /health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Enabled,
    Disabled,
    Unreachable,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Enabled => "enabled",
            CacheStatus::Disabled => "disabled",
            CacheStatus::Unreachable => "unreachable",
        }
    }
}

impl SearchCache {
    pub fn new(redis: Option<RedisService>, ttl_seconds: u64) -> Self {
        Self { redis, ttl_seconds }
    }

    /// Cache that never stores anything
    pub fn disabled() -> Self {
        Self::new(None, 0)
    }

    /// Connect when a URL is given; an unreachable Redis disables the cache
    pub async fn connect(redis_url: Option<&str>, ttl_seconds: u64) -> Self {
        let Some(url) = redis_url else {
            tracing::info!("REDIS_URL not set, search cache disabled");
            return Self::disabled();
        };

        match RedisService::new(url).await {
            Ok(redis) => {
                tracing::info!("Search cache connected: {}", url);
                Self::new(Some(redis), ttl_seconds)
            }
            Err(e) => {
                tracing::warn!("Search cache unavailable ({}), continuing without it", e);
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.redis.is_some() && self.ttl_seconds > 0
    }

    pub async fn status(&self) -> CacheStatus {
        match &self.redis {
            None => CacheStatus::Disabled,
            Some(redis) => match redis.ping().await {
                Ok(true) => CacheStatus::Enabled,
                _ => CacheStatus::Unreachable,
            },
        }
    }

    /// Look up a cached page. The generation read here is kept in the
    /// returned lookup so a miss is stored under the same generation.
    pub async fn get(&self, filter: &SearchFilter) -> CacheLookup {
        let Some(redis) = self.redis.as_ref().filter(|_| self.is_enabled()) else {
            return CacheLookup::default();
        };

        let generation = match redis.get_counter(GENERATION_KEY).await {
            Ok(generation) => generation,
            Err(e) => {
                tracing::warn!("Search cache generation read failed: {}", e);
                return CacheLookup::default();
            }
        };

        let hit = match redis.get(&cache_key(generation, filter)).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!("Search cache read failed: {}", e);
                None
            }
        };

        CacheLookup {
            generation: Some(generation),
            hit,
        }
    }

    /// Store a page under the generation captured by `lookup`.
    /// A page computed before an invalidation lands under the old
    /// generation and is never served.
    pub async fn put(
        &self,
        lookup: &CacheLookup,
        filter: &SearchFilter,
        results: &SearchResults,
    ) {
        let Some(redis) = self.redis.as_ref().filter(|_| self.is_enabled()) else {
            return;
        };
        let Some(key) = lookup.store_key(filter) else {
            return;
        };

        if let Err(e) = redis.set_ex(&key, results, self.ttl_seconds).await {
            tracing::warn!("Search cache write failed: {}", e);
        }
    }

    /// Invalidate every cached search
    pub async fn invalidate(&self) {
        let Some(redis) = &self.redis else {
            return;
        };

        match redis.incr(GENERATION_KEY).await {
            Ok(generation) => tracing::debug!("Search cache generation now {}", generation),
            Err(e) => tracing::warn!("Search cache invalidation failed: {}", e),
        }
    }
}

/// Outcome of a cache lookup
#[derive(Debug, Default)]
pub struct CacheLookup {
    /// Generation the lookup ran against; `None` when the cache was skipped
    pub generation: Option<u64>,
    pub hit: Option<SearchResults>,
}

impl CacheLookup {
    /// Key a freshly computed page should be stored under
    pub fn store_key(&self, filter: &SearchFilter) -> Option<String> {
        self.generation.map(|generation| cache_key(generation, filter))
    }
}

/// `search:<generation>:<sha1 of the normalized filter>`
pub fn cache_key(generation: u64, filter: &SearchFilter) -> String {
    let mut hasher = Sha1::new();
    hasher.update(filter.fingerprint().as_bytes());
    format!("search:{}:{:x}", generation, hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageLimits;
    use crate::models::SearchParams;

    fn filter(q: &str) -> SearchFilter {
        SearchFilter::from_params(
            SearchParams {
                q: Some(q.to_string()),
                ..Default::default()
            },
            PageLimits::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_cache_key_shape() {
        let key = cache_key(3, &filter("bolero"));
        assert!(key.starts_with("search:3:"));
        // SHA1 produces 40 hex chars
        assert_eq!(key.len(), "search:3:".len() + 40);
    }

    #[test]
    fn test_cache_key_stable_for_equal_filters() {
        assert_eq!(cache_key(1, &filter("bolero")), cache_key(1, &filter(" bolero  ")));
        assert_ne!(cache_key(1, &filter("bolero")), cache_key(1, &filter("firebird")));
    }

    #[test]
    fn test_generation_changes_key() {
        assert_ne!(cache_key(1, &filter("bolero")), cache_key(2, &filter("bolero")));
    }

    #[tokio::test]
    async fn test_disabled_cache_is_noop() {
        let cache = SearchCache::disabled();
        assert!(!cache.is_enabled());
        assert_eq!(cache.status().await, CacheStatus::Disabled);
        let lookup = cache.get(&filter("bolero")).await;
        assert!(lookup.hit.is_none());
        assert!(lookup.store_key(&filter("bolero")).is_none());
        cache.invalidate().await;
    }

    #[test]
    fn test_store_key_uses_captured_generation() {
        // Looked up at generation 4; an add bumping the counter to 5 while
        // the query runs must not move the stored page to 5.
        let lookup = CacheLookup {
            generation: Some(4),
            hit: None,
        };
        let key = lookup.store_key(&filter("bolero")).unwrap();
        assert_eq!(key, cache_key(4, &filter("bolero")));
        assert_ne!(key, cache_key(5, &filter("bolero")));
    }
}
