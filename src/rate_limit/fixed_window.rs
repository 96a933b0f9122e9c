//! Per-client fixed-window rate limiting.
//!
//! Each client gets a counter and the instant its current window opened. A
//! window that has been open for strictly longer than the configured
//! duration is replaced by a fresh one on the next request.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use scrobble_stats::rate_limit::KeyedRateLimiter;
//!
//! let mut limiter: KeyedRateLimiter<String> = KeyedRateLimiter::new(
//!     Duration::from_secs(60), // Window size
//!     25,                      // Max requests per window
//! );
//!
//! assert!(limiter.allow("203.0.113.7"));
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Request count for a single client within its current window.
#[derive(Debug, Clone, Copy)]
pub struct FixedWindow {
    /// Requests admitted in this window.
    count: u32,
    /// When this window opened.
    window_start: Instant,
}

impl FixedWindow {
    /// Open a new window at `now` with the first request already counted.
    fn open(now: Instant) -> Self {
        Self {
            count: 1,
            window_start: now,
        }
    }

    /// Requests admitted in the current window.
    pub fn count(&self) -> u32 {
        self.count
    }

    fn expired(&self, window: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.window_start) > window
    }
}

/// Per-client fixed-window rate limiter.
///
/// Records are never removed automatically; call [`KeyedRateLimiter::cleanup`]
/// if the set of clients is unbounded.
#[derive(Debug)]
pub struct KeyedRateLimiter<K> {
    /// Window per client
    windows: HashMap<K, FixedWindow>,
    /// Window duration
    window: Duration,
    /// Maximum requests per window
    max_requests: u32,
}

impl<K> KeyedRateLimiter<K>
where
    K: Hash + Eq,
{
    /// Create a new per-client rate limiter.
    ///
    /// # Arguments
    ///
    /// * `window` - The fixed window duration
    /// * `max_requests` - Maximum number of requests allowed per window
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            windows: HashMap::new(),
            window,
            max_requests,
        }
    }

    /// Decide whether a request from `client` is admitted, counting it if so.
    ///
    /// A denied request leaves the record untouched.
    pub fn allow(&mut self, client: impl Into<K>) -> bool {
        self.allow_at(client.into(), Instant::now())
    }

    pub(crate) fn allow_at(&mut self, client: K, now: Instant) -> bool {
        let Some(record) = self.windows.get_mut(&client) else {
            self.windows.insert(client, FixedWindow::open(now));
            return true;
        };

        if record.expired(self.window, now) {
            *record = FixedWindow::open(now);
            return true;
        }

        if record.count >= self.max_requests {
            return false;
        }

        record.count += 1;
        true
    }

    /// Get the requests left for a client in its current window.
    pub fn remaining(&self, client: &K) -> u32 {
        let now = Instant::now();
        match self.windows.get(client) {
            Some(record) if !record.expired(self.window, now) => {
                self.max_requests.saturating_sub(record.count)
            }
            _ => self.max_requests,
        }
    }

    /// Time until the client's current window closes.
    ///
    /// Returns `None` if the client has no open window.
    pub fn time_until_reset(&self, client: &K) -> Option<Duration> {
        let now = Instant::now();
        self.windows
            .get(client)
            .filter(|record| !record.expired(self.window, now))
            .map(|record| {
                self.window
                    .saturating_sub(now.saturating_duration_since(record.window_start))
            })
    }

    /// Get the current record for a client.
    pub fn record(&self, client: &K) -> Option<&FixedWindow> {
        self.windows.get(client)
    }

    /// Drop records whose window has already expired.
    pub fn cleanup(&mut self) {
        let now = Instant::now();
        let window = self.window;
        self.windows.retain(|_, record| !record.expired(window, now));
    }

    /// Get the number of clients being tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}
