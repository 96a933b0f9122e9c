//! Profile-level statistics from `user.getinfo`.

use rust_decimal::{Decimal, RoundingStrategy};
use time::OffsetDateTime;

use crate::error::ScrobbleError;
use crate::lastfm::ScrobbleSource;
use crate::service::types::BasicStats;

/// Average scrobbles per day since registration, rounded to one decimal place.
///
/// The day count is the number of whole days elapsed and never less than
/// one, so an account registered moments ago divides by one.
pub fn average_per_day(total: u64, registered_at: OffsetDateTime, now: OffsetDateTime) -> Decimal {
    let days = (now - registered_at).whole_days().max(1);
    (Decimal::from(total) / Decimal::from(days))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Fetch the total scrobble count and registration time of a user.
pub async fn fetch_basic_stats<S>(
    source: &S,
    username: &str,
    now: OffsetDateTime,
) -> Result<BasicStats, ScrobbleError>
where
    S: ScrobbleSource + ?Sized,
{
    let user = source.get_user_info(username).await?;

    let unixtime = i64::try_from(user.registered.unixtime).map_err(|_| {
        ScrobbleError::InvalidResponse(format!(
            "registration time out of range: {}",
            user.registered.unixtime
        ))
    })?;
    let registered_at = OffsetDateTime::from_unix_timestamp(unixtime)
        .map_err(|e| ScrobbleError::InvalidResponse(format!("invalid registration time: {e}")))?;

    Ok(BasicStats {
        total_scrobbles: user.playcount,
        registered_at_epoch_millis: unixtime.saturating_mul(1000),
        avg_per_day: average_per_day(user.playcount, registered_at, now),
    })
}
