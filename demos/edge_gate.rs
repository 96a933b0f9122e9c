//! Example: Rate limiting widget requests per client before serving them.
//!
//! Run with: cargo run --example edge_gate

use std::time::Duration;

use scrobble_stats::ScrobbleError;
use scrobble_stats::cache::{SharedCache, keys};
use scrobble_stats::rate_limit::{RateLimitConfig, SharedRateLimiter};

#[tokio::main]
async fn main() {
    let limiter = SharedRateLimiter::new(RateLimitConfig {
        window: Duration::from_secs(1),
        max_requests: 3,
        enabled: true,
    });

    for attempt in 1..=5 {
        match limiter.check("198.51.100.7").await {
            Ok(()) => println!("request {attempt}: served"),
            Err(ScrobbleError::RateLimitExceeded { retry_after_ms }) => {
                println!("request {attempt}: rejected, retry after {retry_after_ms:?}ms")
            }
            Err(err) => println!("request {attempt}: {err}"),
        }
    }
    println!("Clients tracked: {}", limiter.tracked_clients().await);

    tokio::time::sleep(Duration::from_millis(1100)).await;
    println!("After the window: allowed = {}", limiter.allow("198.51.100.7").await);

    // Rendered widgets can be cached the same way the service caches data.
    let rendered: SharedCache<String> = SharedCache::new();
    let key = keys::stats("alice");
    rendered
        .set(key.clone(), "<div>1,234 scrobbles</div>".to_string(), Duration::from_millis(200))
        .await;
    println!("Cached widget: {:?}", rendered.get(&key).await);
    tokio::time::sleep(Duration::from_millis(250)).await;
    println!("After TTL: {:?}", rendered.get(&key).await);
}
