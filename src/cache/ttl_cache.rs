//! Time-to-live cache with a per-entry expiration deadline.
//!
//! Every entry carries its own deadline, set when it is inserted. Expired
//! entries are invisible to readers and are dropped lazily on access or by an
//! explicit [`TtlCache::cleanup`] sweep. There is no capacity bound.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use scrobble_stats::cache::TtlCache;
//!
//! let mut cache: TtlCache<String, u64> = TtlCache::new();
//!
//! cache.set("stats_alice".to_string(), 1234, Duration::from_secs(30));
//! assert_eq!(cache.get(&"stats_alice".to_string()), Some(&1234));
//!
//! cache.remove(&"stats_alice".to_string());
//! assert!(cache.get(&"stats_alice".to_string()).is_none());
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// A single cached value and the instant it stops being readable.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// A cache whose entries expire individually.
///
/// Re-inserting a key replaces both the value and the deadline, so an older
/// deadline can never evict a newer value.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq,
{
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Store `value` under `key` for `ttl`.
    ///
    /// Any existing entry for `key` is replaced along with its deadline.
    pub fn set(&mut self, key: K, value: V, ttl: Duration) {
        self.set_at(key, value, ttl, Instant::now());
    }

    pub(crate) fn set_at(&mut self, key: K, value: V, ttl: Duration, now: Instant) {
        let expires_at = now.checked_add(ttl).unwrap_or(now);
        self.entries.insert(key, CacheEntry { value, expires_at });
    }

    /// Get a reference to a value if it exists and hasn't expired.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_at(key, Instant::now())
    }

    pub(crate) fn get_at(&self, key: &K, now: Instant) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| &entry.value)
    }

    /// Get a value, dropping the entry if it has expired.
    pub fn get_or_evict(&mut self, key: &K) -> Option<&V> {
        let now = Instant::now();
        if self.entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Time left before the entry for `key` expires.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    pub fn time_to_live(&self, key: &K) -> Option<Duration> {
        let now = Instant::now();
        self.entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.expires_at.saturating_duration_since(now))
    }

    /// Remove an entry from the cache.
    ///
    /// Returns the value if it existed and hadn't expired, `None` otherwise.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let now = Instant::now();
        self.entries
            .remove(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value)
    }

    /// Check if a key exists and hasn't expired.
    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Remove all expired entries from the cache.
    pub fn cleanup(&mut self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.is_live(now));
    }

    /// Get the number of entries in the cache (including expired ones).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the number of non-expired entries.
    pub fn active_count(&self) -> usize {
        let now = Instant::now();
        self.entries.values().filter(|entry| entry.is_live(now)).count()
    }

    /// Drop every entry, live or expired.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_never_set_is_absent() {
        let cache: TtlCache<String, i32> = TtlCache::new();
        assert_eq!(cache.get(&"missing".to_string()), None);
        assert!(!cache.contains(&"missing".to_string()));
    }

    #[test]
    fn test_set_and_get() {
        let mut cache: TtlCache<String, i32> = TtlCache::new();

        cache.set("key1".to_string(), 100, Duration::from_secs(60));
        assert_eq!(cache.get(&"key1".to_string()), Some(&100));
        assert_eq!(cache.get(&"key2".to_string()), None);
    }

    #[test]
    fn test_expiration() {
        let mut cache: TtlCache<String, i32> = TtlCache::new();

        cache.set("key1".to_string(), 100, Duration::from_millis(50));
        assert!(cache.get(&"key1".to_string()).is_some());

        thread::sleep(Duration::from_millis(60));
        assert!(cache.get(&"key1".to_string()).is_none());
    }

    #[test]
    fn test_expires_exactly_at_deadline() {
        let mut cache: TtlCache<&str, i32> = TtlCache::new();
        let start = Instant::now();

        cache.set_at("key", 1, Duration::from_secs(30), start);
        assert_eq!(cache.get_at(&"key", start + Duration::from_secs(29)), Some(&1));
        assert_eq!(cache.get_at(&"key", start + Duration::from_secs(30)), None);
    }

    #[test]
    fn test_reset_outlives_original_deadline() {
        let mut cache: TtlCache<&str, i32> = TtlCache::new();
        let start = Instant::now();

        cache.set_at("key", 1, Duration::from_secs(10), start);
        cache.set_at("key", 2, Duration::from_secs(10), start + Duration::from_secs(5));

        // Past the first deadline, the newer entry must still be readable.
        assert_eq!(cache.get_at(&"key", start + Duration::from_secs(12)), Some(&2));
        assert_eq!(cache.get_at(&"key", start + Duration::from_secs(15)), None);
    }

    #[test]
    fn test_reset_with_shorter_ttl() {
        let mut cache: TtlCache<&str, i32> = TtlCache::new();
        let start = Instant::now();

        cache.set_at("key", 1, Duration::from_secs(60), start);
        cache.set_at("key", 2, Duration::from_secs(5), start);
        assert_eq!(cache.get_at(&"key", start + Duration::from_secs(6)), None);
    }

    #[test]
    fn test_remove() {
        let mut cache: TtlCache<String, i32> = TtlCache::new();

        cache.set("key1".to_string(), 100, Duration::from_secs(60));
        assert_eq!(cache.remove(&"key1".to_string()), Some(100));
        assert_eq!(cache.get(&"key1".to_string()), None);
    }

    #[test]
    fn test_cleanup() {
        let mut cache: TtlCache<String, i32> = TtlCache::new();

        cache.set("key1".to_string(), 100, Duration::from_millis(50));
        cache.set("key2".to_string(), 200, Duration::from_secs(60));
        assert_eq!(cache.len(), 2);

        thread::sleep(Duration::from_millis(60));

        // Entry still in the map but expired
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.active_count(), 1);

        cache.cleanup();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_or_evict_drops_expired() {
        let mut cache: TtlCache<String, i32> = TtlCache::new();

        cache.set("key1".to_string(), 100, Duration::from_millis(20));
        thread::sleep(Duration::from_millis(30));

        assert!(cache.get_or_evict(&"key1".to_string()).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_drops_live_entries() {
        let mut cache: TtlCache<String, i32> = TtlCache::new();

        cache.set("key1".to_string(), 100, Duration::from_secs(60));
        cache.set("key2".to_string(), 200, Duration::from_secs(60));
        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.get(&"key1".to_string()).is_none());
    }

    #[test]
    fn test_time_to_live() {
        let mut cache: TtlCache<String, i32> = TtlCache::new();

        cache.set("key1".to_string(), 100, Duration::from_secs(60));
        let ttl = cache.time_to_live(&"key1".to_string()).unwrap();
        assert!(ttl <= Duration::from_secs(60));
        assert!(ttl > Duration::from_secs(59));
    }
}
