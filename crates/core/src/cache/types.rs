//! Types for the search result cache.

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// A stored value and the instant after which it must not be returned.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    /// Entries currently stored (may include expired, uncollected ones).
    pub entries: usize,
    /// Maximum number of entries.
    pub capacity: usize,
    /// Default time-to-live.
    pub ttl_secs: u64,
    /// Lookups that returned a live entry.
    pub hits: u64,
    /// Lookups that found nothing usable.
    pub misses: u64,
    /// Entries dropped because they outlived their TTL.
    pub expirations: u64,
    /// Live entries dropped to stay within capacity.
    pub evictions: u64,
    /// hits / (hits + misses), 0 when there were no lookups.
    pub hit_rate: f64,
}
