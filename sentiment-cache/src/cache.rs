//! In-memory sharded TTL cache with a byte ceiling.

use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use sentiment_core::constants::{
    CACHE_ENTRY_OVERHEAD_BYTES, DEFAULT_CACHE_CLEAN_WINDOW_MS, DEFAULT_CACHE_ENTRY_TTL_MS,
    DEFAULT_CACHE_MAX_SIZE_MB, DEFAULT_CACHE_SHARDS,
};
use sentiment_core::error::{Result, SentimentError};

const BYTES_PER_MB: usize = 1024 * 1024;

/// Cache entry with insertion time.
struct CacheEntry {
    payload: Vec<u8>,
    inserted_at: Instant,
}

impl CacheEntry {
    fn new(payload: Vec<u8>) -> Self {
        Self {
            payload,
            inserted_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

/// Bytes charged against the ceiling for one entry.
fn entry_cost(key_len: usize, payload_len: usize) -> usize {
    key_len + payload_len + CACHE_ENTRY_OVERHEAD_BYTES
}

/// Cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Memory ceiling in megabytes (0 disables the ceiling)
    pub max_size_mb: usize,
    /// Lifetime of every entry in milliseconds
    pub entry_ttl_ms: u64,
    /// Number of independently locked shards (rounded up to a power of two)
    pub shards: usize,
    /// Interval between background sweeps of expired entries in milliseconds
    pub clean_window_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size_mb: DEFAULT_CACHE_MAX_SIZE_MB,
            entry_ttl_ms: DEFAULT_CACHE_ENTRY_TTL_MS,
            shards: DEFAULT_CACHE_SHARDS,
            clean_window_ms: DEFAULT_CACHE_CLEAN_WINDOW_MS,
        }
    }
}

impl CacheConfig {
    /// Sets the memory ceiling.
    pub fn with_max_size_mb(mut self, max_size_mb: usize) -> Self {
        self.max_size_mb = max_size_mb;
        self
    }

    /// Sets the entry TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.entry_ttl_ms = ttl.as_millis() as u64;
        self
    }

    /// Sets the shard count.
    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = shards;
        self
    }

    /// Entry TTL as a `Duration`.
    pub fn entry_ttl(&self) -> Duration {
        Duration::from_millis(self.entry_ttl_ms)
    }

    /// Sweep interval as a `Duration`.
    pub fn clean_window(&self) -> Duration {
        Duration::from_millis(self.clean_window_ms)
    }

    /// Memory ceiling in bytes, `None` when unbounded.
    pub fn capacity_bytes(&self) -> Option<usize> {
        match self.max_size_mb {
            0 => None,
            mb => Some(mb.saturating_mul(BYTES_PER_MB)),
        }
    }
}

/// One independently locked slice of the key space.
struct Shard {
    entries: LruCache<String, CacheEntry>,
    size_bytes: usize,
}

impl Shard {
    fn new() -> Self {
        Self {
            entries: LruCache::unbounded(),
            size_bytes: 0,
        }
    }

    fn remove(&mut self, key: &str) -> bool {
        match self.entries.pop(key) {
            Some(old) => {
                self.size_bytes -= entry_cost(key.len(), old.payload.len());
                true
            }
            None => false,
        }
    }

    fn reap_expired(&mut self, ttl: Duration) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| e.is_expired(ttl))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &expired {
            self.remove(key);
        }
        expired.len()
    }

    fn evict_lru(&mut self) -> bool {
        match self.entries.pop_lru() {
            Some((key, old)) => {
                self.size_bytes -= entry_cost(key.len(), old.payload.len());
                trace!(key = %key, "Evicted cache entry");
                true
            }
            None => false,
        }
    }
}

/// Memory-bounded TTL cache of encoded results.
///
/// Thread-safe. Each shard is guarded by its own mutex, so a `set` racing a
/// `get` on the same key observes either the old or the new value, never a
/// torn one. Callers must tolerate a miss at any time.
pub struct ResultCache {
    shards: Box<[Mutex<Shard>]>,
    hasher: RandomState,
    shard_mask: usize,
    shard_capacity: Option<usize>,
    ttl: Duration,
    config: CacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl ResultCache {
    /// Creates a new cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        let shard_count = config.shards.max(1).next_power_of_two();
        let shards = (0..shard_count)
            .map(|_| Mutex::new(Shard::new()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        let shard_capacity = config.capacity_bytes().map(|total| total / shard_count);

        Self {
            shards,
            hasher: RandomState::new(),
            shard_mask: shard_count - 1,
            shard_capacity,
            ttl: config.entry_ttl(),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
        }
    }

    fn shard(&self, key: &str) -> &Mutex<Shard> {
        let idx = (self.hasher.hash_one(key) as usize) & self.shard_mask;
        &self.shards[idx]
    }

    /// Gets a copy of the bytes stored under `key`.
    ///
    /// Returns None if absent or expired. Expired entries are dropped on sight.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut shard = self.shard(key).lock();

        let expired = match shard.entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.payload.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            shard.remove(key);
            self.expirations.fetch_add(1, Ordering::Relaxed);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Stores `payload` under `key`, replacing any previous entry.
    ///
    /// Evicts least-recently-used entries of the key's shard until the new
    /// entry fits. Fails only when the entry alone exceeds a shard's capacity.
    pub fn set(&self, key: &str, payload: Vec<u8>) -> Result<()> {
        let cost = entry_cost(key.len(), payload.len());
        if let Some(limit) = self.shard_capacity {
            if cost > limit {
                return Err(SentimentError::CacheEntryTooLarge { size: cost, limit });
            }
        }

        let mut shard = self.shard(key).lock();
        shard.remove(key);

        if let Some(limit) = self.shard_capacity {
            if shard.size_bytes + cost > limit {
                let reaped = shard.reap_expired(self.ttl);
                self.expirations.fetch_add(reaped as u64, Ordering::Relaxed);
            }
            while shard.size_bytes + cost > limit && shard.evict_lru() {
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }

        shard.size_bytes += cost;
        shard.entries.push(key.to_owned(), CacheEntry::new(payload));
        Ok(())
    }

    /// Removes a cached entry. Returns true if one was present.
    pub fn remove(&self, key: &str) -> bool {
        self.shard(key).lock().remove(key)
    }

    /// Clears all cached entries.
    pub fn clear(&self) {
        for shard in self.shards.iter() {
            let mut shard = shard.lock();
            shard.entries.clear();
            shard.size_bytes = 0;
        }
    }

    /// Removes all expired entries and returns how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let reaped: usize = self
            .shards
            .iter()
            .map(|shard| shard.lock().reap_expired(self.ttl))
            .sum();
        self.expirations.fetch_add(reaped as u64, Ordering::Relaxed);
        reaped
    }

    /// Returns the number of stored entries, including expired ones not yet reaped.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().entries.len()).sum()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the bytes currently charged against the ceiling.
    pub fn size_bytes(&self) -> usize {
        self.shards.iter().map(|s| s.lock().size_bytes).sum()
    }

    /// Returns the configuration this cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let (entries, size_bytes) = self.shards.iter().fold((0, 0), |(n, bytes), shard| {
            let shard = shard.lock();
            (n + shard.entries.len(), bytes + shard.size_bytes)
        });

        CacheStats {
            entries,
            size_bytes,
            capacity_bytes: self.config.capacity_bytes(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
        }
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Clone, Debug, Serialize)]
pub struct CacheStats {
    /// Stored entries (including expired ones not yet reaped)
    pub entries: usize,
    /// Bytes charged against the ceiling
    pub size_bytes: usize,
    /// Memory ceiling in bytes, None when unbounded
    pub capacity_bytes: Option<usize>,
    /// Lookups that returned a value
    pub hits: u64,
    /// Lookups that returned nothing
    pub misses: u64,
    /// Live entries dropped to make room
    pub evictions: u64,
    /// Entries dropped because their TTL elapsed
    pub expirations: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn small_cache(max_size_mb: usize, shards: usize) -> ResultCache {
        ResultCache::with_config(
            CacheConfig::default()
                .with_max_size_mb(max_size_mb)
                .with_shards(shards),
        )
    }

    #[test]
    fn test_cache_set_get() {
        let cache = ResultCache::new();
        cache.set("hello", vec![1, 2, 3]).unwrap();
        assert_eq!(cache.get("hello"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_cache_keys_are_exact() {
        let cache = ResultCache::new();
        cache.set("hello", vec![1]).unwrap();
        assert!(cache.get("Hello").is_none());
        assert!(cache.get(" hello").is_none());
    }

    #[test]
    fn test_cache_miss() {
        let cache = ResultCache::new();
        assert!(cache.get("nonexistent").is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_cache_set_replaces() {
        let cache = ResultCache::new();
        cache.set("k", vec![1; 10]).unwrap();
        cache.set("k", vec![2; 4]).unwrap();
        assert_eq!(cache.get("k"), Some(vec![2; 4]));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.size_bytes(), entry_cost(1, 4));
    }

    #[test]
    fn test_cache_remove() {
        let cache = ResultCache::new();
        cache.set("k", vec![1]).unwrap();
        assert!(cache.remove("k"));
        assert!(!cache.remove("k"));
        assert!(cache.get("k").is_none());
        assert_eq!(cache.size_bytes(), 0);
    }

    #[test]
    fn test_cache_clear() {
        let cache = ResultCache::new();
        cache.set("a", vec![1]).unwrap();
        cache.set("b", vec![2]).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.size_bytes(), 0);
    }

    #[test]
    fn test_cache_ttl_expiration() {
        let cache = ResultCache::with_config(CacheConfig::default().with_ttl(Duration::from_millis(1)));
        cache.set("k", vec![1]).unwrap();

        std::thread::sleep(Duration::from_millis(10));

        assert!(cache.get("k").is_none());
        // Lazily dropped on lookup
        assert!(cache.is_empty());
        assert_eq!(cache.stats().expirations, 1);
    }

    #[test]
    fn test_cache_cleanup_expired() {
        let cache = ResultCache::with_config(CacheConfig::default().with_ttl(Duration::from_millis(1)));
        cache.set("a", vec![1]).unwrap();
        cache.set("b", vec![2]).unwrap();

        std::thread::sleep(Duration::from_millis(10));

        assert_eq!(cache.cleanup_expired(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_memory_ceiling_evicts_lru() {
        // 1 MB, one shard: room for three ~300 KB entries but not four
        let cache = small_cache(1, 1);
        let blob = vec![0u8; 300 * 1024];

        cache.set("a", blob.clone()).unwrap();
        cache.set("b", blob.clone()).unwrap();
        cache.set("c", blob.clone()).unwrap();

        // Touch "a" so that "b" becomes least recently used
        assert!(cache.get("a").is_some());
        cache.set("d", blob).unwrap();

        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
        assert!(cache.get("d").is_some());
        assert_eq!(cache.stats().evictions, 1);
        assert!(cache.size_bytes() <= BYTES_PER_MB);
    }

    #[test]
    fn test_cache_rejects_oversized_entry() {
        let cache = small_cache(1, 1);
        let err = cache.set("huge", vec![0u8; 2 * BYTES_PER_MB]).unwrap_err();
        assert!(matches!(err, SentimentError::CacheEntryTooLarge { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_unbounded_when_zero() {
        let cache = small_cache(0, 1);
        cache.set("big", vec![0u8; 2 * BYTES_PER_MB]).unwrap();
        assert!(cache.get("big").is_some());
        assert!(cache.stats().capacity_bytes.is_none());
    }

    #[test]
    fn test_shard_count_rounded_to_power_of_two() {
        let cache = small_cache(64, 5);
        assert_eq!(cache.shards.len(), 8);
        let cache = small_cache(64, 0);
        assert_eq!(cache.shards.len(), 1);
    }

    #[test]
    fn test_cache_stats() {
        let cache = ResultCache::new();
        cache.set("a", vec![1]).unwrap();
        cache.set("b", vec![2]).unwrap();
        cache.get("a");
        cache.get("zzz");

        let stats = cache.stats();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.capacity_bytes, Some(64 * BYTES_PER_MB));
    }

    #[test]
    fn test_cache_concurrent_access() {
        let cache = std::sync::Arc::new(ResultCache::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..200 {
                        let key = format!("key-{}", i % 20);
                        cache.set(&key, vec![t as u8; 16]).unwrap();
                        if let Some(v) = cache.get(&key) {
                            assert_eq!(v.len(), 16);
                            assert!(v.iter().all(|b| *b == v[0]));
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.len(), 20);
    }

    proptest! {
        #[test]
        fn prop_size_never_exceeds_ceiling(
            ops in proptest::collection::vec((0u8..32, 0usize..200 * 1024), 1..60)
        ) {
            let cache = small_cache(1, 2);
            for (k, len) in ops {
                cache.set(&format!("k{}", k), vec![0u8; len]).unwrap();
                prop_assert!(cache.size_bytes() <= BYTES_PER_MB);
            }
        }
    }
}
