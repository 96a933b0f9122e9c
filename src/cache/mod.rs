//! Process-lifetime caching for upstream responses.
//!
//! [`TtlCache`] is the single-owner store. [`SharedCache`] wraps one in a
//! mutex so the service layer can share it between concurrent requests; each
//! `get`/`set` is one lock acquisition and no lock is held across an upstream
//! call.
//!
//! Neither type bounds its size. Entries for usernames that are never asked
//! for again stay in the map until they are read after expiry or
//! [`SharedCache::cleanup`] is called.
//!
//! ```rust
//! use std::time::Duration;
//! use scrobble_stats::cache::SharedCache;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let cache: SharedCache<u64> = SharedCache::new();
//! cache.set("stats_alice", 1234, Duration::from_secs(30)).await;
//! assert_eq!(cache.get("stats_alice").await, Some(1234));
//! # }
//! ```

mod ttl_cache;

pub use ttl_cache::TtlCache;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

/// A cloneable, thread-safe handle to a string-keyed [`TtlCache`].
///
/// Clones share the same underlying map.
#[derive(Debug)]
pub struct SharedCache<V> {
    inner: Arc<Mutex<TtlCache<String, V>>>,
}

impl<V: Clone> SharedCache<V> {
    /// Create an empty shared cache.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(TtlCache::new())),
        }
    }

    /// Get a clone of the value stored under `key`, if present and unexpired.
    ///
    /// An expired entry is dropped on the way out.
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut cache = self.inner.lock().await;
        cache.get_or_evict(&key.to_string()).cloned()
    }

    /// Store `value` under `key` for `ttl`, replacing any previous entry.
    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let mut cache = self.inner.lock().await;
        cache.set(key.into(), value, ttl);
    }

    /// Remove the entry stored under `key`.
    pub async fn remove(&self, key: &str) -> Option<V> {
        let mut cache = self.inner.lock().await;
        cache.remove(&key.to_string())
    }

    /// Drop every expired entry.
    pub async fn cleanup(&self) {
        self.inner.lock().await.cleanup();
    }

    /// Drop every entry, live or expired.
    pub async fn clear(&self) {
        self.inner.lock().await.clear();
    }

    /// Number of entries held, including expired ones not yet dropped.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Whether the map holds no entries at all.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

impl<V: Clone> Default for SharedCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for SharedCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Cache key builders shared by the service layer.
pub mod keys {
    use crate::types::Period;

    /// Key for the aggregated stats of a user.
    pub fn stats(username: &str) -> String {
        format!("stats_{username}")
    }

    /// Key for the long-lived streak entry of a user.
    pub fn streak(username: &str) -> String {
        format!("streak_{username}")
    }

    /// Key for the currently playing track of a user.
    pub fn currently_playing(username: &str) -> String {
        format!("currently-playing_{username}")
    }

    pub fn top_artists(username: &str, limit: u32, period: Period) -> String {
        format!("artists_{username}_{limit}_{period}")
    }

    pub fn top_tracks(username: &str, limit: u32, period: Period) -> String {
        format!("tracks_{username}_{limit}_{period}")
    }

    pub fn top_albums(username: &str, limit: u32, period: Period) -> String {
        format!("albums_{username}_{limit}_{period}")
    }
}
