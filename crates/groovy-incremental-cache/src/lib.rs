//! A concurrency-safe TTL+LRU cache keyed by logical module name.
//!
//! Readers never block each other: the backing map is a [`DashMap`], sharded
//! internally, so a `get` on one key never contends with a `get` or `put` on
//! another. Recency tracking for LRU eviction is a small `Vec` behind a
//! short-lived [`parking_lot::Mutex`], touched on every hit and every
//! insert — the same shape the rest of this codebase uses for its other
//! bounded caches.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use groovy_phase::Phase;
use parking_lot::Mutex;

/// Construction-time cache sizing. Defaults match the documented service
/// defaults: 100 entries, 30 second TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 100, ttl: Duration::from_secs(30) }
    }
}

/// Point-in-time hit/miss/eviction counters, approximate under concurrent
/// mutation (the same caveat the cache's `size()` carries).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct Entry<V> {
    fingerprint: u64,
    phase: Phase,
    value: V,
    inserted_at: Instant,
}

impl<V> Entry<V> {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

/// A cache entry as handed to [`TtlLruCache::put`]: everything except the
/// bookkeeping timestamps, which the cache itself stamps on insertion.
pub struct NewEntry<V> {
    pub fingerprint: u64,
    pub phase: Phase,
    pub value: V,
}

/// A TTL+LRU cache mapping logical module name to the most recent
/// compilation reached for it.
pub struct TtlLruCache<V> {
    entries: DashMap<String, Entry<V>>,
    access_order: Mutex<Vec<String>>,
    config: CacheConfig,
    stats: Mutex<CacheStats>,
}

impl<V: Clone> TtlLruCache<V> {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            access_order: Mutex::new(Vec::new()),
            config,
            stats: Mutex::new(CacheStats::default()),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the cached value for `name` iff it exists, its fingerprint
    /// matches `fingerprint`, its reached phase satisfies `requested_phase`,
    /// and it has not expired. Touches LRU recency on a hit; an expired
    /// entry is removed and counted as a miss.
    pub fn get(&self, name: &str, requested_phase: Phase, fingerprint: u64) -> Option<V> {
        let hit = {
            let Some(entry) = self.entries.get(name) else {
                self.record_miss();
                return None;
            };

            if entry.is_expired(self.config.ttl) {
                drop(entry);
                self.remove_entry(name);
                self.record_expiration();
                return None;
            }

            if entry.fingerprint != fingerprint || !entry.phase.satisfies(requested_phase) {
                drop(entry);
                self.record_miss();
                return None;
            }

            entry.value.clone()
        };

        self.touch_access_order(name);
        self.record_hit();
        Some(hit)
    }

    /// Insert or replace the entry for `name`, evicting the least-recently
    /// used entry first if capacity would otherwise be exceeded.
    pub fn put(&self, name: &str, entry: NewEntry<V>) {
        let now = Instant::now();
        self.entries.insert(
            name.to_string(),
            Entry {
                fingerprint: entry.fingerprint,
                phase: entry.phase,
                value: entry.value,
                inserted_at: now,
            },
        );
        self.touch_access_order(name);
        self.evict_if_over_capacity();
    }

    /// Remove the entry for `name`, if present. No error if absent.
    pub fn invalidate(&self, name: &str) {
        self.remove_entry(name);
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.access_order.lock().clear();
    }

    /// Approximate entry count under concurrent mutation.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        *self.stats.lock()
    }

    fn remove_entry(&self, name: &str) {
        self.entries.remove(name);
        let mut order = self.access_order.lock();
        order.retain(|k| k != name);
    }

    fn touch_access_order(&self, name: &str) {
        let mut order = self.access_order.lock();
        order.retain(|k| k != name);
        order.push(name.to_string());
    }

    fn evict_if_over_capacity(&self) {
        while self.entries.len() > self.config.max_entries {
            let victim = {
                let order = self.access_order.lock();
                order.first().cloned()
            };
            let Some(victim) = victim else { break };
            self.entries.remove(&victim);
            self.access_order.lock().retain(|k| k != &victim);
            let mut stats = self.stats.lock();
            stats.evictions += 1;
            tracing::info!(name = %victim, "evicted cache entry over capacity");
        }
    }

    fn record_hit(&self) {
        self.stats.lock().hits += 1;
    }

    fn record_miss(&self) {
        self.stats.lock().misses += 1;
    }

    fn record_expiration(&self) {
        let mut stats = self.stats.lock();
        stats.misses += 1;
        stats.expirations += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration as StdDuration;

    fn entry(fingerprint: u64, phase: Phase, value: &'static str) -> NewEntry<&'static str> {
        NewEntry { fingerprint, phase, value }
    }

    #[test]
    fn miss_on_absent_key() {
        let cache: TtlLruCache<&'static str> = TtlLruCache::new(CacheConfig::default());
        assert_eq!(cache.get("Missing.groovy", Phase::Parsing, 1), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn hit_requires_matching_fingerprint() {
        let cache = TtlLruCache::new(CacheConfig::default());
        cache.put("A.groovy", entry(1, Phase::Conversion, "ast-a"));
        assert_eq!(cache.get("A.groovy", Phase::Conversion, 1), Some("ast-a"));
        assert_eq!(cache.get("A.groovy", Phase::Conversion, 2), None);
    }

    #[test]
    fn phase_monotonicity_satisfies_lower_or_equal_requests() {
        let cache = TtlLruCache::new(CacheConfig::default());
        cache.put("A.groovy", entry(1, Phase::SemanticAnalysis, "ast-a"));
        assert_eq!(cache.get("A.groovy", Phase::Parsing, 1), Some("ast-a"));
        assert_eq!(cache.get("A.groovy", Phase::SemanticAnalysis, 1), Some("ast-a"));
        assert_eq!(cache.get("A.groovy", Phase::Output, 1), None);
    }

    #[test]
    fn ttl_expiry_evicts_on_next_get() {
        let cache = TtlLruCache::new(CacheConfig { max_entries: 100, ttl: StdDuration::from_millis(5) });
        cache.put("A.groovy", entry(1, Phase::Conversion, "ast-a"));
        thread::sleep(StdDuration::from_millis(20));
        assert_eq!(cache.get("A.groovy", Phase::Conversion, 1), None);
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn s6_capacity_eviction_evicts_least_recently_used() {
        let cache = TtlLruCache::new(CacheConfig { max_entries: 3, ttl: StdDuration::from_secs(30) });
        cache.put("Test0.groovy", entry(0, Phase::Conversion, "ast0"));
        cache.put("Test1.groovy", entry(1, Phase::Conversion, "ast1"));
        cache.put("Test2.groovy", entry(2, Phase::Conversion, "ast2"));
        cache.put("Test3.groovy", entry(3, Phase::Conversion, "ast3"));

        assert_eq!(cache.size(), 3);
        assert_eq!(cache.get("Test0.groovy", Phase::Conversion, 0), None);
        assert_eq!(cache.get("Test1.groovy", Phase::Conversion, 1), Some("ast1"));
        assert_eq!(cache.get("Test2.groovy", Phase::Conversion, 2), Some("ast2"));
        assert_eq!(cache.get("Test3.groovy", Phase::Conversion, 3), Some("ast3"));
    }

    #[test]
    fn touching_an_entry_protects_it_from_eviction() {
        let cache = TtlLruCache::new(CacheConfig { max_entries: 2, ttl: StdDuration::from_secs(30) });
        cache.put("A.groovy", entry(0, Phase::Conversion, "a"));
        cache.put("B.groovy", entry(0, Phase::Conversion, "b"));
        // Touch A so B becomes the least-recently-used entry.
        assert_eq!(cache.get("A.groovy", Phase::Conversion, 0), Some("a"));
        cache.put("C.groovy", entry(0, Phase::Conversion, "c"));

        assert_eq!(cache.get("B.groovy", Phase::Conversion, 0), None);
        assert_eq!(cache.get("A.groovy", Phase::Conversion, 0), Some("a"));
        assert_eq!(cache.get("C.groovy", Phase::Conversion, 0), Some("c"));
    }

    #[test]
    fn invalidate_removes_single_entry() {
        let cache = TtlLruCache::new(CacheConfig::default());
        cache.put("A.groovy", entry(0, Phase::Conversion, "a"));
        cache.invalidate("A.groovy");
        assert_eq!(cache.get("A.groovy", Phase::Conversion, 0), None);
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache = TtlLruCache::new(CacheConfig::default());
        cache.put("A.groovy", entry(0, Phase::Conversion, "a"));
        cache.put("B.groovy", entry(0, Phase::Conversion, "b"));
        cache.clear();
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn stats_track_hits_and_misses() {
        let cache = TtlLruCache::new(CacheConfig::default());
        cache.put("A.groovy", entry(0, Phase::Conversion, "a"));
        let _ = cache.get("A.groovy", Phase::Conversion, 0);
        let _ = cache.get("Missing.groovy", Phase::Conversion, 0);
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }
}
