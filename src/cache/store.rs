use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::future::Cache;

use crate::clock::Clock;
use crate::models::{DiscoverRequest, RawItem};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Raw, unresolved discovery inputs
    Discover {
        scare: String,
        runtime: String,
        era: String,
        locale: String,
    },
}

impl CacheKey {
    pub fn discover(request: &DiscoverRequest) -> Self {
        CacheKey::Discover {
            scare: request.scare.clone(),
            runtime: request.runtime.clone(),
            era: request.era.clone(),
            locale: request.locale.clone(),
        }
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Discover {
                scare,
                runtime,
                era,
                locale,
            } => write!(f, "{}:{}:{}:{}", scare, runtime, era, locale),
        }
    }
}

/// How old an entry may be and still be returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Only entries younger than the TTL
    Fresh,
    /// Any entry, regardless of age
    AllowStale,
}

/// Configuration for the discovery cache.
///
/// ```rust
/// # use nightfright_api::cache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(500)
///     .ttl(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached aggregates. Default: 1,000.
    pub max_entries: usize,
    /// Age below which an entry counts as fresh. Default: 1 hour.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_entries(mut self, n: usize) -> Self {
        self.max_entries = n;
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// One stored aggregate. Replaced whole, never patched.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub stored_at: Instant,
    pub results: Arc<Vec<RawItem>>,
}

/// Process-wide store of discovery aggregates.
///
/// Backed by moka with a capacity bound and no expiry: entries past the TTL
/// stay resident so they can serve as a stale fallback. Freshness is judged
/// on read from `stored_at`.
///
/// Reads and writes for the same key are not coordinated: two concurrent
/// misses both fetch and the later `put` wins.
pub struct CacheStore {
    cache: Cache<CacheKey, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries.max(1) as u64)
            .build();

        Self {
            cache,
            ttl: config.ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Retrieves the results stored under `key`.
    ///
    /// With [`Freshness::Fresh`] an entry whose age has reached the TTL is
    /// reported as absent even though it is still held.
    pub async fn get(&self, key: &CacheKey, freshness: Freshness) -> Option<Arc<Vec<RawItem>>> {
        let entry = self.cache.get(key).await?;

        match freshness {
            Freshness::AllowStale => Some(entry.results),
            Freshness::Fresh => {
                let age = self.clock.now().saturating_duration_since(entry.stored_at);
                (age < self.ttl).then_some(entry.results)
            }
        }
    }

    /// Replaces any entry under `key` with `results`, timestamped now
    pub async fn put(&self, key: CacheKey, results: Vec<RawItem>) {
        let entry = CacheEntry {
            stored_at: self.clock.now(),
            results: Arc::new(results),
        };

        tracing::debug!(key = %key, items = entry.results.len(), "Cached discovery aggregate");
        self.cache.insert(key, entry).await;
    }

    /// Number of held entries, fresh or stale, after pending evictions
    pub async fn len(&self) -> usize {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count() as usize
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
