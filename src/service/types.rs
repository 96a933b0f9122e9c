//! Result types returned by the service layer.
//!
//! These serialize to the camelCase JSON shape the widget routes render.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::types::serde_helpers::iso_date_option;

/// Image served when Last.fm has no artwork.
pub const DEFAULT_IMAGE: &str = "/images/default.jpg";

/// Profile-level numbers from `user.getinfo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicStats {
    pub total_scrobbles: u64,
    /// Registration time in milliseconds since the Unix epoch.
    pub registered_at_epoch_millis: i64,
    /// Scrobbles per day since registration, one decimal place.
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_per_day: Decimal,
}

/// The current run of consecutive listening days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakResult {
    /// Length of the run in days.
    pub days: u32,
    /// First day of the run.
    #[serde(with = "iso_date_option")]
    pub start_date: Option<Date>,
    /// Most recent day with a scrobble.
    #[serde(with = "iso_date_option")]
    pub end_date: Option<Date>,
}

impl StreakResult {
    /// The result for a user with no dated scrobbles.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Aggregated statistics shown by the stats widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_scrobbles: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_per_day: Decimal,
    pub current_streak: u32,
    #[serde(with = "iso_date_option")]
    pub streak_start_date: Option<Date>,
    #[serde(with = "iso_date_option")]
    pub streak_end_date: Option<Date>,
}

impl UserStats {
    /// Combine profile numbers and a streak.
    pub fn new(basic: &BasicStats, streak: &StreakResult) -> Self {
        Self {
            total_scrobbles: basic.total_scrobbles,
            avg_per_day: basic.avg_per_day,
            current_streak: streak.days,
            streak_start_date: streak.start_date,
            streak_end_date: streak.end_date,
        }
    }
}

/// A name and a link, used for artists and albums.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub url: String,
}

/// The most recent or in-progress track of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub name: String,
    /// Track page, `#` when unknown.
    pub url: String,
    pub artist: Link,
    pub album: Link,
    pub image: String,
}

/// Currently playing state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    /// Whether `track` is playing right now rather than the last one finished.
    pub now_playing: bool,
    /// `None` when the user has never scrobbled.
    pub track: Option<TrackSummary>,
}

impl NowPlaying {
    /// State for a user with no listening history.
    pub fn idle() -> Self {
        Self {
            now_playing: false,
            track: None,
        }
    }
}

/// An entry of the top artists feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopArtist {
    pub name: String,
    pub url: String,
    pub playcount: u64,
    pub image: String,
}

/// An entry of the top tracks or top albums feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopItem {
    pub name: String,
    pub url: String,
    pub playcount: u64,
    pub artist: Link,
    pub image: String,
}

/// Top tracks entry.
pub type TopTrack = TopItem;

/// Top albums entry.
pub type TopAlbum = TopItem;

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_user_stats_json_shape() {
        let stats = UserStats {
            total_scrobbles: 1234,
            avg_per_day: Decimal::new(123, 1),
            current_streak: 3,
            streak_start_date: Some(date!(2024 - 01 - 03)),
            streak_end_date: Some(date!(2024 - 01 - 05)),
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "totalScrobbles": 1234,
                "avgPerDay": 12.3,
                "currentStreak": 3,
                "streakStartDate": "2024-01-03",
                "streakEndDate": "2024-01-05"
            })
        );
    }

    #[test]
    fn test_empty_streak_serializes_nulls() {
        let json = serde_json::to_value(StreakResult::none()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"days": 0, "startDate": null, "endDate": null})
        );
    }

    #[test]
    fn test_idle_now_playing() {
        let json = serde_json::to_value(NowPlaying::idle()).unwrap();
        assert_eq!(json, serde_json::json!({"nowPlaying": false, "track": null}));
    }
}
