//! Edge rate limiting for widget requests.
//!
//! Widget endpoints are public, so each caller (usually identified by IP
//! address) is held to a fixed number of requests per window before any
//! upstream work happens. The limiter lives in front of the service layer,
//! not inside it.
//!
//! ## Example
//!
//! ```rust
//! use scrobble_stats::rate_limit::{RateLimitConfig, SharedRateLimiter};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let limiter = SharedRateLimiter::new(RateLimitConfig::default());
//!
//! if limiter.allow("198.51.100.4").await {
//!     // serve the widget
//! }
//! # }
//! ```

mod fixed_window;

pub use fixed_window::{FixedWindow, KeyedRateLimiter};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::error::ScrobbleError;

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Length of one fixed window.
    pub window: Duration,
    /// Requests admitted per client per window.
    pub max_requests: u32,
    /// Whether to enforce the limit at all.
    pub enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(limits::WINDOW_MS),
            max_requests: limits::MAX_REQUESTS,
            enabled: true,
        }
    }
}

/// Default edge limits.
pub mod limits {
    /// Window length in milliseconds.
    pub const WINDOW_MS: u64 = 60_000;
    /// Requests per client per window.
    pub const MAX_REQUESTS: u32 = 25;
}

/// A cloneable, thread-safe per-client limiter.
///
/// The read-modify-write of a client's record happens under one lock
/// acquisition, so concurrent requests from the same client are counted
/// exactly once each.
#[derive(Debug, Clone)]
pub struct SharedRateLimiter {
    config: RateLimitConfig,
    limiter: Arc<Mutex<KeyedRateLimiter<String>>>,
}

impl SharedRateLimiter {
    /// Create a new limiter from configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        let limiter = KeyedRateLimiter::new(config.window, config.max_requests);
        Self {
            config,
            limiter: Arc::new(Mutex::new(limiter)),
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Decide whether a request from `client_id` is admitted.
    pub async fn allow(&self, client_id: &str) -> bool {
        if !self.config.enabled {
            return true;
        }
        self.limiter.lock().await.allow(client_id)
    }

    /// Like [`SharedRateLimiter::allow`], but reports a denial as an error
    /// carrying the time left in the client's window.
    pub async fn check(&self, client_id: &str) -> Result<(), ScrobbleError> {
        if !self.config.enabled {
            return Ok(());
        }

        let mut limiter = self.limiter.lock().await;
        if limiter.allow(client_id) {
            return Ok(());
        }

        let retry_after_ms = limiter
            .time_until_reset(&client_id.to_string())
            .map(|wait| wait.as_millis() as u64);
        tracing::debug!(client_id, ?retry_after_ms, "rate limit exceeded");
        Err(ScrobbleError::RateLimitExceeded { retry_after_ms })
    }

    /// Requests left for `client_id` in its current window.
    pub async fn remaining(&self, client_id: &str) -> u32 {
        self.limiter.lock().await.remaining(&client_id.to_string())
    }

    /// Drop records whose window has already expired.
    pub async fn cleanup(&self) {
        self.limiter.lock().await.cleanup();
    }

    /// Number of clients currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.limiter.lock().await.tracked_clients()
    }
}

impl Default for SharedRateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
