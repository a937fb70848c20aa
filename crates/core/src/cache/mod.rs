//! In-memory cache for search results with per-entry expiry.
//!
//! Entries live in a [`DashMap`], which shards the key space internally so
//! lookups for unrelated keys do not contend. Expiry is checked lazily on
//! read. The total number of entries is capped; a full cache first drops
//! expired entries and then evicts the entry closest to expiry.
//!
//! Nothing is persisted. An empty cache is always a correct cache.

mod types;

pub use types::*;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

use crate::config::CacheConfig;
use crate::metrics::{CACHE_EVICTIONS, CACHE_LOOKUPS};

/// Longest time-to-live an entry can be given. Longer TTLs are clamped.
pub const MAX_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Time-expiring key-value store bounded by entry count.
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
    evictions: AtomicU64,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache with the given default TTL, capacity and shard count.
    ///
    /// The shard count is rounded up to a power of two (at least 2), and the
    /// capacity is at least one entry.
    pub fn new(ttl: Duration, max_entries: usize, shards: usize) -> Self {
        let shard_amount = shards.max(2).next_power_of_two();

        Self {
            entries: DashMap::with_shard_amount(shard_amount),
            ttl: ttl.min(MAX_TTL),
            max_entries: max_entries.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Create a cache from the `[cache]` configuration section.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(
            Duration::from_secs(config.ttl_secs),
            config.max_entries,
            config.shards,
        )
    }

    /// Default time-to-live applied by [`TtlCache::set`].
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    /// Look up a live entry. Expired entries are removed and reported as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();

        let live = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Some(entry.value.clone()),
            Some(_) => None,
            None => {
                self.record_miss();
                return None;
            }
        };

        if let Some(value) = live {
            self.record_hit();
            return Some(value);
        }

        // A concurrent set may have replaced the entry since the read above.
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired(now))
            .is_some()
        {
            self.record_expired(1);
            debug!(key = key, "Cache entry expired");
        }
        self.record_miss();
        None
    }

    /// Insert or replace an entry using the default TTL.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.ttl);
    }

    /// Insert or replace an entry with an explicit TTL, clamped to [`MAX_TTL`].
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let now = Instant::now();
        let entry = CacheEntry {
            value,
            expires_at: now + ttl.min(MAX_TTL),
        };

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.make_room(now);
        }
        self.entries.insert(key, entry);
    }

    /// Remove an entry. Returns true if one was present.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, including expired ones not yet collected.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all expired entries and return how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let removed = self.drop_expired(Instant::now());
        if removed > 0 {
            self.record_expired(removed as u64);
        }
        removed
    }

    /// Snapshot of cache counters.
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        CacheStats {
            entries: self.len(),
            capacity: self.capacity(),
            ttl_secs: self.ttl.as_secs(),
            hits,
            misses,
            expirations: self.expirations.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
        }
    }

    /// Free one slot in a full cache.
    fn make_room(&self, now: Instant) {
        let expired = self.drop_expired(now);
        if expired > 0 {
            self.record_expired(expired as u64);
        }

        if self.entries.len() < self.max_entries {
            return;
        }

        let victim = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().expires_at)
            .map(|entry| entry.key().clone());

        if let Some(key) = victim {
            if self.entries.remove(&key).is_some() {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                CACHE_EVICTIONS.with_label_values(&["capacity"]).inc();
                debug!(key = %key, "Cache full, evicted entry");
            }
        }
    }

    fn drop_expired(&self, now: Instant) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
    }

    fn record_expired(&self, count: u64) {
        self.expirations.fetch_add(count, Ordering::Relaxed);
        CACHE_EVICTIONS
            .with_label_values(&["expired"])
            .inc_by(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn cache(ttl_secs: u64, max_entries: usize, shards: usize) -> TtlCache<Vec<u32>> {
        TtlCache::new(Duration::from_secs(ttl_secs), max_entries, shards)
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let cache = cache(300, 100, 4);
        assert!(cache.get("nope").is_none());

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = cache(300, 100, 4);
        cache.set("title:10:dune", vec![1, 2, 3]);

        assert_eq!(cache.get("title:10:dune"), Some(vec![1, 2, 3]));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let cache = cache(300, 100, 4);
        cache.set("k", vec![1]);
        cache.set("k", vec![2, 2]);

        assert_eq!(cache.get("k"), Some(vec![2, 2]));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = cache(300, 100, 4);
        cache.set("k", vec![7]);

        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(cache.get("k"), Some(vec![7]));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("k").is_none());

        // The expired entry was collected on read.
        assert!(cache.is_empty());
        let stats = cache.stats();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_with_ttl_overrides_default() {
        let cache = cache(300, 100, 4);
        cache.set_with_ttl("short", vec![1], Duration::from_secs(5));
        cache.set("long", vec![2]);

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(cache.get("short").is_none());
        assert_eq!(cache.get("long"), Some(vec![2]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = cache(10, 100, 4);
        cache.set("a", vec![1]);
        cache.set("b", vec![2]);
        tokio::time::advance(Duration::from_secs(11)).await;
        cache.set("c", vec![3]);

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().expirations, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_evicts_oldest() {
        let cache = cache(300, 2, 1);
        cache.set("first", vec![1]);
        tokio::time::advance(Duration::from_secs(1)).await;
        cache.set("second", vec![2]);
        tokio::time::advance(Duration::from_secs(1)).await;
        cache.set("third", vec![3]);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("first").is_none());
        assert_eq!(cache.get("second"), Some(vec![2]));
        assert_eq!(cache.get("third"), Some(vec![3]));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_cache_prefers_dropping_expired() {
        let cache = cache(300, 2, 1);
        cache.set_with_ttl("stale", vec![0], Duration::from_secs(1));
        cache.set("fresh", vec![1]);
        tokio::time::advance(Duration::from_secs(2)).await;
        cache.set("new", vec![2]);

        assert_eq!(cache.get("fresh"), Some(vec![1]));
        assert_eq!(cache.get("new"), Some(vec![2]));
        let stats = cache.stats();
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.expirations, 1);
    }

    #[tokio::test]
    async fn test_overwrite_in_full_cache_does_not_evict() {
        let cache = cache(300, 1, 1);
        cache.set("only", vec![1]);
        cache.set("only", vec![2]);

        assert_eq!(cache.get("only"), Some(vec![2]));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let cache = cache(300, 100, 4);
        cache.set("a", vec![1]);
        cache.set("b", vec![2]);

        assert!(cache.remove("a"));
        assert!(!cache.remove("a"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_bounds() {
        let sharded = cache(300, 100, 8);
        assert_eq!(sharded.capacity(), 100);

        // Zero capacity and zero or odd shard counts are still usable.
        let tiny = cache(1, 0, 0);
        assert_eq!(tiny.capacity(), 1);
        tiny.set("a", vec![1]);
        tiny.set("b", vec![2]);
        assert_eq!(tiny.len(), 1);
        assert_eq!(tiny.get("b"), Some(vec![2]));

        let odd = cache(1, 10, 3);
        odd.set("a", vec![1]);
        assert_eq!(odd.get("a"), Some(vec![1]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_ttl_is_clamped() {
        let cache: TtlCache<Vec<u32>> = TtlCache::new(Duration::MAX, 10, 2);
        assert_eq!(cache.ttl(), MAX_TTL);

        cache.set("k", vec![1]);
        cache.set_with_ttl("explicit", vec![2], Duration::from_secs(u64::MAX));

        tokio::time::advance(MAX_TTL - Duration::from_secs(1)).await;
        assert_eq!(cache.get("k"), Some(vec![1]));
        assert_eq!(cache.get("explicit"), Some(vec![2]));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("k").is_none());
        assert!(cache.get("explicit").is_none());
    }

    #[test]
    fn test_stats_hit_rate() {
        let cache = cache(300, 100, 4);
        cache.set("k", vec![1]);
        cache.get("k");
        cache.get("k");
        cache.get("k");
        cache.get("missing");

        let stats = cache.stats();
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 0.75).abs() < f64::EPSILON);
        assert_eq!(stats.ttl_secs, 300);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_access() {
        let cache = Arc::new(cache(300, 1_000, 8));
        let mut handles = Vec::new();

        for task in 0..16u32 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                for i in 0..200u32 {
                    let key = format!("key-{}", i % 20);
                    if (task + i) % 3 == 0 {
                        cache.set(key, vec![task, i]);
                    } else {
                        let _ = cache.get(&key);
                    }
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert!(cache.len() <= 20);
        let stats = cache.stats();
        assert!(stats.hits + stats.misses > 0);
    }
}
