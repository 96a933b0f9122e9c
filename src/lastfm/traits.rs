//! Trait definition for the upstream listening-history source.
//!
//! The service layer is generic over [`ScrobbleSource`] so it can run against
//! [`LastfmClient`](crate::lastfm::LastfmClient) in production and against an
//! in-memory fake in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use scrobble_stats::lastfm::{ScrobbleSource, LastfmClient};
//!
//! async fn total<S: ScrobbleSource>(source: &S) -> Result<u64, scrobble_stats::ScrobbleError> {
//!     Ok(source.get_user_info("rj").await?.playcount)
//! }
//! ```

use std::future::Future;

use crate::error::ScrobbleError;
use crate::lastfm::types::{
    ChartRequest, RecentTracks, RecentTracksRequest, TopAlbums, TopArtists, TopTracks, TrackInfo,
    TrackInfoRequest, UserInfo,
};

/// Read-only Last.fm operations the service layer depends on.
///
/// All methods are async and return `Result<T, ScrobbleError>`.
pub trait ScrobbleSource: Send + Sync {
    /// Get profile information for a user.
    fn get_user_info(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<UserInfo, ScrobbleError>> + Send;

    /// Get one page of listening history, newest first.
    fn get_recent_tracks(
        &self,
        request: &RecentTracksRequest,
    ) -> impl Future<Output = Result<RecentTracks, ScrobbleError>> + Send;

    /// Get the most played artists for a period.
    fn get_top_artists(
        &self,
        request: &ChartRequest,
    ) -> impl Future<Output = Result<TopArtists, ScrobbleError>> + Send;

    /// Get the most played tracks for a period.
    fn get_top_tracks(
        &self,
        request: &ChartRequest,
    ) -> impl Future<Output = Result<TopTracks, ScrobbleError>> + Send;

    /// Get the most played albums for a period.
    fn get_top_albums(
        &self,
        request: &ChartRequest,
    ) -> impl Future<Output = Result<TopAlbums, ScrobbleError>> + Send;

    /// Look up a single track.
    fn get_track_info(
        &self,
        request: &TrackInfoRequest,
    ) -> impl Future<Output = Result<TrackInfo, ScrobbleError>> + Send;
}
