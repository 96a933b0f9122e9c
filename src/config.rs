//! Environment-driven configuration.
//!
//! Every setting has a default. A variable that is set but cannot be parsed
//! is ignored with a warning, so a typo in one value never stops the service
//! from starting.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::EnvApiKey;
use crate::lastfm::LastfmClient;
use crate::lastfm::endpoints::{LASTFM_BASE_URL, MAX_RECENT_TRACKS_PAGE_SIZE};
use crate::rate_limit::{RateLimitConfig, limits};

/// Environment variable names.
pub mod vars {
    pub const BASE_URL: &str = "LASTFM_BASE_URL";
    pub const RATE_LIMIT_WINDOW_MS: &str = "RATE_LIMIT_WINDOW_MS";
    pub const RATE_LIMIT_MAX_REQUESTS: &str = "RATE_LIMIT_MAX_REQUESTS";
    pub const STATS_CACHE_TTL_SECS: &str = "STATS_CACHE_TTL_SECS";
    pub const STREAK_CACHE_TTL_SECS: &str = "STREAK_CACHE_TTL_SECS";
    pub const NOW_PLAYING_CACHE_TTL_SECS: &str = "NOW_PLAYING_CACHE_TTL_SECS";
    pub const CHART_CACHE_TTL_SECS: &str = "CHART_CACHE_TTL_SECS";
    pub const STREAK_PAGE_SIZE: &str = "STREAK_PAGE_SIZE";
    pub const STREAK_PAGE_CAP: &str = "STREAK_PAGE_CAP";
    pub const STREAK_MAX_LOOKBACK_DAYS: &str = "STREAK_MAX_LOOKBACK_DAYS";
    pub const MIN_ARTISTS: &str = "MIN_ARTISTS";
    pub const MAX_ARTISTS: &str = "MAX_ARTISTS";
    pub const MIN_TRACKS: &str = "MIN_TRACKS";
    pub const MAX_TRACKS: &str = "MAX_TRACKS";
    pub const MIN_ALBUMS: &str = "MIN_ALBUMS";
    pub const MAX_ALBUMS: &str = "MAX_ALBUMS";
}

/// How long each kind of result stays cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    /// Aggregated user stats.
    pub stats: Duration,
    /// Streak-only entries.
    pub streak: Duration,
    /// Currently playing track.
    pub now_playing: Duration,
    /// Top artists, tracks and albums.
    pub chart: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            stats: Duration::from_secs(30),
            streak: Duration::from_secs(6 * 60 * 60),
            now_playing: Duration::from_secs(30),
            chart: Duration::from_secs(300),
        }
    }
}

/// Bounds on the history scan behind a streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakSettings {
    /// Scrobbles requested per page.
    pub page_size: u32,
    /// Most pages fetched for one computation.
    pub page_cap: u32,
    /// Stop paging once a page reaches scrobbles older than this many days.
    pub max_lookback_days: u32,
    /// Most days walked backward from the latest active day.
    pub max_walk_days: u32,
}

impl Default for StreakSettings {
    fn default() -> Self {
        Self {
            page_size: MAX_RECENT_TRACKS_PAGE_SIZE,
            page_cap: 100,
            max_lookback_days: 365,
            max_walk_days: 1000,
        }
    }
}

/// An inclusive range a requested chart size is clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitRange {
    pub min: u32,
    pub max: u32,
}

impl LimitRange {
    /// Create a range. Swapped bounds are put back in order.
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    /// Clamp `limit` into the range.
    pub fn clamp(&self, limit: u32) -> u32 {
        limit.clamp(self.min, self.max)
    }
}

impl Default for LimitRange {
    fn default() -> Self {
        Self::new(1, 50)
    }
}

/// Size bounds for each chart feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedLimits {
    pub artists: LimitRange,
    pub tracks: LimitRange,
    pub albums: LimitRange,
}

/// Complete service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Last.fm API base URL.
    pub base_url: String,
    /// Edge rate limiting.
    pub rate_limit: RateLimitConfig,
    /// Cache lifetimes.
    pub cache_ttls: CacheTtls,
    /// Streak scan bounds.
    pub streak: StreakSettings,
    /// Chart size bounds.
    pub feed_limits: FeedLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: LASTFM_BASE_URL.to_string(),
            rate_limit: RateLimitConfig::default(),
            cache_ttls: CacheTtls::default(),
            streak: StreakSettings::default(),
            feed_limits: FeedLimits::default(),
        }
    }
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let reader = EnvReader { lookup };

        let base_url = reader
            .raw(vars::BASE_URL)
            .unwrap_or(defaults.base_url);

        let rate_limit = RateLimitConfig {
            window: Duration::from_millis(
                reader.parse(vars::RATE_LIMIT_WINDOW_MS, limits::WINDOW_MS),
            ),
            max_requests: reader.parse(vars::RATE_LIMIT_MAX_REQUESTS, limits::MAX_REQUESTS),
            enabled: defaults.rate_limit.enabled,
        };

        let ttls = defaults.cache_ttls;
        let cache_ttls = CacheTtls {
            stats: reader.secs(vars::STATS_CACHE_TTL_SECS, ttls.stats),
            streak: reader.secs(vars::STREAK_CACHE_TTL_SECS, ttls.streak),
            now_playing: reader.secs(vars::NOW_PLAYING_CACHE_TTL_SECS, ttls.now_playing),
            chart: reader.secs(vars::CHART_CACHE_TTL_SECS, ttls.chart),
        };

        let streak_defaults = defaults.streak;
        let page_size = reader
            .parse(vars::STREAK_PAGE_SIZE, streak_defaults.page_size)
            .clamp(1, MAX_RECENT_TRACKS_PAGE_SIZE);
        let page_cap = reader.parse(vars::STREAK_PAGE_CAP, streak_defaults.page_cap);
        if page_cap == 0 {
            tracing::warn!(variable = vars::STREAK_PAGE_CAP, "page cap must be at least 1, using 1");
        }
        let streak = StreakSettings {
            page_size,
            page_cap: page_cap.max(1),
            max_lookback_days: reader.parse(
                vars::STREAK_MAX_LOOKBACK_DAYS,
                streak_defaults.max_lookback_days,
            ),
            max_walk_days: streak_defaults.max_walk_days,
        };

        let feed_limits = FeedLimits {
            artists: reader.range(vars::MIN_ARTISTS, vars::MAX_ARTISTS),
            tracks: reader.range(vars::MIN_TRACKS, vars::MAX_TRACKS),
            albums: reader.range(vars::MIN_ALBUMS, vars::MAX_ALBUMS),
        };

        Self {
            base_url,
            rate_limit,
            cache_ttls,
            streak,
            feed_limits,
        }
    }

    /// Build a Last.fm client for the configured base URL, reading the API
    /// key from `LASTFM_API_KEY`.
    pub fn lastfm_client(&self) -> LastfmClient {
        let builder = LastfmClient::builder().base_url(&self.base_url);
        match EnvApiKey::try_from_env() {
            Some(key) => builder.api_key(Arc::new(key)).build(),
            None => {
                tracing::warn!("LASTFM_API_KEY is not set; upstream calls will fail");
                builder.build()
            }
        }
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn raw(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn parse<T>(&self, name: &str, default: T) -> T
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        let Some(value) = self.raw(name) else {
            return default;
        };
        match value.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!(variable = name, %value, %default, "invalid value, using default");
                default
            }
        }
    }

    fn secs(&self, name: &str, default: Duration) -> Duration {
        Duration::from_secs(self.parse(name, default.as_secs()))
    }

    fn range(&self, min_name: &str, max_name: &str) -> LimitRange {
        let default = LimitRange::default();
        LimitRange::new(
            self.parse(min_name, default.min),
            self.parse(max_name, default.max),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| env.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]);
        assert_eq!(config.base_url, LASTFM_BASE_URL);
        assert_eq!(config.rate_limit.window, Duration::from_secs(60));
        assert_eq!(config.rate_limit.max_requests, 25);
        assert_eq!(config.cache_ttls, CacheTtls::default());
        assert_eq!(config.cache_ttls.streak, Duration::from_secs(21_600));
        assert_eq!(config.streak.page_size, 200);
        assert_eq!(config.streak.page_cap, 100);
        assert_eq!(config.streak.max_lookback_days, 365);
        assert_eq!(config.feed_limits.tracks, LimitRange::new(1, 50));
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            ("LASTFM_BASE_URL", "http://127.0.0.1:9000/2.0/"),
            ("RATE_LIMIT_WINDOW_MS", "1000"),
            ("RATE_LIMIT_MAX_REQUESTS", "3"),
            ("CHART_CACHE_TTL_SECS", "60"),
            ("STREAK_PAGE_CAP", "5"),
            ("MAX_ARTISTS", "10"),
        ]);
        assert_eq!(config.base_url, "http://127.0.0.1:9000/2.0/");
        assert_eq!(config.rate_limit.window, Duration::from_secs(1));
        assert_eq!(config.rate_limit.max_requests, 3);
        assert_eq!(config.cache_ttls.chart, Duration::from_secs(60));
        assert_eq!(config.streak.page_cap, 5);
        assert_eq!(config.feed_limits.artists, LimitRange::new(1, 10));
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = config_with(&[
            ("RATE_LIMIT_MAX_REQUESTS", "lots"),
            ("STATS_CACHE_TTL_SECS", "-5"),
            ("LASTFM_BASE_URL", "   "),
        ]);
        assert_eq!(config.rate_limit.max_requests, 25);
        assert_eq!(config.cache_ttls.stats, Duration::from_secs(30));
        assert_eq!(config.base_url, LASTFM_BASE_URL);
    }

    #[test]
    fn test_page_size_capped_at_upstream_maximum() {
        let config = config_with(&[("STREAK_PAGE_SIZE", "1000")]);
        assert_eq!(config.streak.page_size, 200);
    }

    #[test]
    fn test_zero_page_cap_raised_to_one() {
        let config = config_with(&[("STREAK_PAGE_CAP", "0")]);
        assert_eq!(config.streak.page_cap, 1);
    }

    #[test]
    fn test_limit_range() {
        let range = LimitRange::new(50, 1);
        assert_eq!(range, LimitRange { min: 1, max: 50 });
        assert_eq!(range.clamp(0), 1);
        assert_eq!(range.clamp(20), 20);
        assert_eq!(range.clamp(500), 50);
    }
}
