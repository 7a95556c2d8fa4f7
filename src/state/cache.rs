//! In-memory prediction cache.
//!
//! Backed by `DashMap` so concurrent searches can share one cache behind an
//! `Arc`. Entries are immutable once written; only the map itself mutates.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use super::PricePrediction;

/// Default freshness window.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Key segment used when no region was given.
const ANY_REGION: &str = "*";

/// A stored prediction with its expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub prediction: Arc<PricePrediction>,
    pub created_at: Instant,
    pub expires_at: Instant,
}

impl CacheEntry {
    /// Usable iff `now < expires_at`.
    pub fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Build the cache key for a (product, region) pair.
///
/// Both parts are trimmed and lowercased; a blank region maps to a sentinel.
pub fn cache_key(product: &str, region: Option<&str>) -> String {
    let product = product.trim().to_lowercase();
    let region = region
        .map(|r| r.trim().to_lowercase())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| ANY_REGION.to_string());
    format!("{}|{}", product, region)
}

/// TTL store of completed predictions. Only successful lookups are stored.
#[derive(Debug)]
pub struct PredictionCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl Default for PredictionCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl PredictionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh prediction for `key`, or `None`. Expired entries are left in place.
    pub fn get(&self, key: &str) -> Option<Arc<PricePrediction>> {
        let now = Instant::now();
        let entry = self.entries.get(key)?;
        if entry.is_fresh(now) {
            debug!("cache hit: {}", key);
            Some(entry.prediction.clone())
        } else {
            debug!("cache entry expired: {}", key);
            None
        }
    }

    pub fn put(&self, key: impl Into<String>, prediction: Arc<PricePrediction>) {
        let now = Instant::now();
        let key = key.into();
        debug!("caching {} for {:?}", key, self.ttl);
        self.entries.insert(
            key,
            CacheEntry {
                prediction,
                created_at: now,
                expires_at: now + self.ttl,
            },
        );
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop expired entries. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now));
        before - self.entries.len()
    }
}
