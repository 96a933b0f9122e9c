//! The statistics service called by widget routes.
//!
//! [`StatsService`] owns one cache per result kind and talks to Last.fm through
//! a [`ScrobbleSource`]. Every public operation checks its cache first; on a
//! miss it calls upstream, stores the result and returns it. Failures are
//! never cached and never produce partial results.
//!
//! Concurrent misses for the same username are not coalesced; each caller
//! does its own upstream work and the last one to finish wins the cache slot.
//!
//! # Example
//!
//! ```rust,no_run
//! use scrobble_stats::config::Config;
//! use scrobble_stats::service::StatsService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = StatsService::from_config(&Config::from_env());
//!     let stats = service.get_user_stats("rj").await?;
//!     println!("{} scrobbles, {} day streak", stats.total_scrobbles, stats.current_streak);
//!     Ok(())
//! }
//! ```

pub mod basic;
mod feeds;
pub mod streak;
pub mod types;

pub use feeds::{summarize_recent_track, top_artist_entry, top_item_entry};
pub use types::*;

use std::sync::Arc;

use time::OffsetDateTime;

use crate::cache::{SharedCache, keys};
use crate::config::{CacheTtls, Config, FeedLimits, StreakSettings};
use crate::error::ScrobbleError;
use crate::lastfm::{LastfmClient, ScrobbleSource};

/// The caches a [`StatsService`] reads and fills.
///
/// Clones share storage, so one set of caches can back several services.
#[derive(Debug, Clone, Default)]
pub struct StatsCaches {
    pub stats: SharedCache<UserStats>,
    pub streak: SharedCache<StreakResult>,
    pub now_playing: SharedCache<NowPlaying>,
    pub top_artists: SharedCache<Vec<TopArtist>>,
    pub top_tracks: SharedCache<Vec<TopTrack>>,
    pub top_albums: SharedCache<Vec<TopAlbum>>,
}

impl StatsCaches {
    /// Drop expired entries from every cache.
    pub async fn cleanup(&self) {
        self.stats.cleanup().await;
        self.streak.cleanup().await;
        self.now_playing.cleanup().await;
        self.top_artists.cleanup().await;
        self.top_tracks.cleanup().await;
        self.top_albums.cleanup().await;
    }
}

/// Cached statistics, streaks and widget feeds for Last.fm users.
pub struct StatsService<S> {
    source: Arc<S>,
    caches: StatsCaches,
    ttls: CacheTtls,
    streak_settings: StreakSettings,
    feed_limits: FeedLimits,
}

impl StatsService<LastfmClient> {
    /// Build a service backed by a Last.fm client from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_config(config.lastfm_client(), config)
    }
}

impl<S: ScrobbleSource> StatsService<S> {
    /// Create a service with default TTLs, limits and fresh caches.
    pub fn new(source: S) -> Self {
        Self::with_config(source, &Config::default())
    }

    /// Create a service using the TTLs and limits from `config`.
    pub fn with_config(source: S, config: &Config) -> Self {
        Self {
            source: Arc::new(source),
            caches: StatsCaches::default(),
            ttls: config.cache_ttls,
            streak_settings: config.streak,
            feed_limits: config.feed_limits,
        }
    }

    /// Replace the caches, e.g. to share them with another service.
    pub fn with_caches(mut self, caches: StatsCaches) -> Self {
        self.caches = caches;
        self
    }

    /// The caches this service reads and fills.
    pub fn caches(&self) -> &StatsCaches {
        &self.caches
    }

    /// The upstream source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Aggregated stats for `username`, cached for the stats TTL.
    ///
    /// On a miss, profile numbers and the streak are fetched concurrently.
    /// A fresh streak also refreshes the long-lived streak entry.
    pub async fn get_user_stats(&self, username: &str) -> Result<UserStats, ScrobbleError> {
        let username = validate_username(username)?;
        let key = keys::stats(username);
        if let Some(stats) = self.caches.stats.get(&key).await {
            tracing::debug!(username, "stats cache hit");
            return Ok(stats);
        }

        let now = OffsetDateTime::now_utc();
        let (basic, streak) = tokio::try_join!(
            basic::fetch_basic_stats(self.source.as_ref(), username, now),
            streak::compute_streak(self.source.as_ref(), username, &self.streak_settings, now),
        )?;

        let stats = UserStats::new(&basic, &streak);
        self.caches.stats.set(key, stats.clone(), self.ttls.stats).await;
        self.caches
            .streak
            .set(keys::streak(username), streak, self.ttls.streak)
            .await;
        tracing::debug!(
            username,
            total = stats.total_scrobbles,
            streak = stats.current_streak,
            "computed user stats"
        );

        Ok(stats)
    }

    /// Total scrobbles and average per day, uncached.
    pub async fn fetch_basic_stats(&self, username: &str) -> Result<BasicStats, ScrobbleError> {
        let username = validate_username(username)?;
        basic::fetch_basic_stats(self.source.as_ref(), username, OffsetDateTime::now_utc()).await
    }

    /// The current streak, recomputed from history without touching any cache.
    pub async fn compute_streak(&self, username: &str) -> Result<StreakResult, ScrobbleError> {
        let username = validate_username(username)?;
        streak::compute_streak(
            self.source.as_ref(),
            username,
            &self.streak_settings,
            OffsetDateTime::now_utc(),
        )
        .await
    }

    /// The current streak, cached for the long streak TTL.
    pub async fn get_streak(&self, username: &str) -> Result<StreakResult, ScrobbleError> {
        let username = validate_username(username)?;
        let key = keys::streak(username);
        if let Some(streak) = self.caches.streak.get(&key).await {
            tracing::debug!(username, "streak cache hit");
            return Ok(streak);
        }

        let streak = streak::compute_streak(
            self.source.as_ref(),
            username,
            &self.streak_settings,
            OffsetDateTime::now_utc(),
        )
        .await?;
        self.caches.streak.set(key, streak, self.ttls.streak).await;
        Ok(streak)
    }
}

impl<S> Clone for StatsService<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            caches: self.caches.clone(),
            ttls: self.ttls,
            streak_settings: self.streak_settings,
            feed_limits: self.feed_limits,
        }
    }
}

impl<S> std::fmt::Debug for StatsService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsService")
            .field("ttls", &self.ttls)
            .field("streak_settings", &self.streak_settings)
            .field("feed_limits", &self.feed_limits)
            .finish_non_exhaustive()
    }
}

/// Reject blank usernames before any upstream call.
fn validate_username(username: &str) -> Result<&str, ScrobbleError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ScrobbleError::Validation("username must not be empty".into()));
    }
    Ok(username)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::streak::tests::{FakeHistory, now_playing, scrobble};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn fake_with_history() -> FakeHistory {
        let now = OffsetDateTime::now_utc();
        FakeHistory::new(vec![vec![
            now_playing(),
            scrobble(now),
            scrobble(now - time::Duration::days(1)),
            scrobble(now - time::Duration::days(3)),
        ]])
        .with_user(1000, now - time::Duration::days(10))
    }

    #[tokio::test]
    async fn test_get_user_stats_combines_sources() {
        let service = StatsService::new(fake_with_history());

        let stats = service.get_user_stats("alice").await.unwrap();
        assert_eq!(stats.total_scrobbles, 1000);
        assert_eq!(stats.avg_per_day, rust_decimal::Decimal::new(100, 0));
        assert_eq!(stats.current_streak, 2);
        assert!(stats.streak_start_date < stats.streak_end_date);
    }

    #[tokio::test]
    async fn test_get_user_stats_cache_hit_skips_upstream() {
        let service = StatsService::new(fake_with_history());

        let first = service.get_user_stats("alice").await.unwrap();
        let second = service.get_user_stats("alice").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(service.source().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_user_stats_refreshes_streak_cache() {
        let service = StatsService::new(fake_with_history());

        let stats = service.get_user_stats("alice").await.unwrap();
        let streak = service.get_streak("alice").await.unwrap();
        assert_eq!(streak.days, stats.current_streak);
        assert_eq!(service.source().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stats_expire_after_ttl() {
        let config = Config {
            cache_ttls: CacheTtls {
                stats: Duration::from_millis(20),
                ..CacheTtls::default()
            },
            ..Config::default()
        };
        let service = StatsService::with_config(fake_with_history(), &config);

        service.get_user_stats("alice").await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        service.get_user_stats("alice").await.unwrap();
        assert_eq!(service.source().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let now = OffsetDateTime::now_utc();
        let source = FakeHistory::new(vec![vec![scrobble(now)]]);
        let service = StatsService::new(source);

        let err = service.get_user_stats("alice").await.unwrap_err();
        assert!(err.is_upstream());
        assert!(service.caches().stats.is_empty().await);
        assert!(service.caches().streak.is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_username_rejected_without_upstream_call() {
        let service = StatsService::new(fake_with_history());

        for username in ["", "   "] {
            let err = service.get_user_stats(username).await.unwrap_err();
            assert!(matches!(err, ScrobbleError::Validation(_)));
            assert!(matches!(
                service.get_streak(username).await,
                Err(ScrobbleError::Validation(_))
            ));
        }
        assert_eq!(service.source().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shared_caches_between_services() {
        let caches = StatsCaches::default();
        let first = StatsService::new(fake_with_history()).with_caches(caches.clone());
        let second = StatsService::new(fake_with_history()).with_caches(caches);

        first.get_streak("alice").await.unwrap();
        second.get_streak("alice").await.unwrap();
        assert_eq!(second.source().calls.load(Ordering::SeqCst), 0);
    }
}
