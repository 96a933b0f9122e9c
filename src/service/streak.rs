//! Listening streak calculation.
//!
//! A streak is the run of consecutive UTC calendar days with at least one
//! scrobble, counted backward from the most recent such day. History is read
//! newest first, one page at a time, until one of three things happens:
//! Last.fm reports no further pages, the page cap is hit, or a page reaches
//! scrobbles older than the lookback window.

use std::collections::BTreeSet;

use time::{Date, OffsetDateTime};

use crate::config::StreakSettings;
use crate::error::ScrobbleError;
use crate::lastfm::{RecentTracksRequest, ScrobbleSource};
use crate::service::types::StreakResult;

/// Compute the streak ending at the latest day in `days`.
///
/// At most `max_walk_days` days are counted.
///
/// ```rust
/// use std::collections::BTreeSet;
/// use time::macros::date;
/// use scrobble_stats::service::streak::streak_from_days;
///
/// let days: BTreeSet<_> = [
///     date!(2024 - 01 - 05),
///     date!(2024 - 01 - 04),
///     date!(2024 - 01 - 03),
///     date!(2024 - 01 - 01),
/// ]
/// .into_iter()
/// .collect();
///
/// let streak = streak_from_days(&days, 1000);
/// assert_eq!(streak.days, 3);
/// assert_eq!(streak.start_date, Some(date!(2024 - 01 - 03)));
/// assert_eq!(streak.end_date, Some(date!(2024 - 01 - 05)));
/// ```
pub fn streak_from_days(days: &BTreeSet<Date>, max_walk_days: u32) -> StreakResult {
    let Some(&end) = days.last() else {
        return StreakResult::none();
    };

    let mut count = 0;
    let mut start = end;
    let mut cursor = Some(end);
    while count < max_walk_days {
        match cursor {
            Some(day) if days.contains(&day) => {
                count += 1;
                start = day;
                cursor = day.previous_day();
            }
            _ => break,
        }
    }

    StreakResult {
        days: count,
        start_date: Some(start),
        end_date: Some(end),
    }
}

/// Collect the set of UTC days on which `username` scrobbled.
///
/// Any failed page fails the whole collection.
pub async fn collect_active_days<S>(
    source: &S,
    username: &str,
    settings: &StreakSettings,
    now: OffsetDateTime,
) -> Result<BTreeSet<Date>, ScrobbleError>
where
    S: ScrobbleSource + ?Sized,
{
    // A lookback reaching past the representable range means no cutoff.
    let cutoff = now.checked_sub(time::Duration::days(i64::from(settings.max_lookback_days)));
    let page_cap = settings.page_cap.max(1);
    let mut days = BTreeSet::new();

    for page in 1..=page_cap {
        let request = RecentTracksRequest::new(username)
            .limit(settings.page_size)
            .page(page);
        let recent = source.get_recent_tracks(&request).await?;

        let mut oldest: Option<OffsetDateTime> = None;
        for track in &recent.track {
            if track.is_now_playing() {
                continue;
            }
            let Some(scrobbled_at) = track.scrobbled_at() else {
                continue;
            };
            days.insert(scrobbled_at.date());
            oldest = Some(oldest.map_or(scrobbled_at, |o| o.min(scrobbled_at)));
        }

        if recent.track.is_empty() || !recent.attr.has_more() {
            tracing::debug!(username, page, "reached end of history");
            break;
        }
        if oldest.zip(cutoff).is_some_and(|(oldest, cutoff)| oldest < cutoff) {
            tracing::debug!(username, page, "reached lookback limit");
            break;
        }
        if page == page_cap {
            tracing::debug!(username, page, "reached page cap");
        }
    }

    Ok(days)
}

/// Page through the history of `username` and compute the current streak.
pub async fn compute_streak<S>(
    source: &S,
    username: &str,
    settings: &StreakSettings,
    now: OffsetDateTime,
) -> Result<StreakResult, ScrobbleError>
where
    S: ScrobbleSource + ?Sized,
{
    let days = collect_active_days(source, username, settings, now).await?;
    Ok(streak_from_days(&days, settings.max_walk_days))
}
