//! `user.*` methods.

use crate::error::ScrobbleError;
use crate::lastfm::LastfmClient;
use crate::lastfm::endpoints::{MAX_RECENT_TRACKS_PAGE_SIZE, methods};
use crate::lastfm::types::{
    ChartRequest, RecentTracks, RecentTracksRequest, RecentTracksResponse, TopAlbums,
    TopAlbumsResponse, TopArtists, TopArtistsResponse, TopTracks, TopTracksResponse, UserInfo,
    UserInfoResponse,
};

#[derive(serde::Serialize)]
struct UserParam<'a> {
    user: &'a str,
}

impl LastfmClient {
    /// Get profile information for a user.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use scrobble_stats::lastfm::LastfmClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = LastfmClient::new();
    ///     let user = client.get_user_info("rj").await?;
    ///     println!("registered at {}", user.registered.unixtime);
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_user_info(&self, username: &str) -> Result<UserInfo, ScrobbleError> {
        let response: UserInfoResponse = self
            .call(methods::USER_GET_INFO, &UserParam { user: username })
            .await?;
        Ok(response.user)
    }

    /// Get one page of a user's listening history, newest first.
    ///
    /// A `limit` above 200 is lowered to 200, the most Last.fm returns per page.
    pub async fn get_recent_tracks(
        &self,
        request: &RecentTracksRequest,
    ) -> Result<RecentTracks, ScrobbleError> {
        let mut request = request.clone();
        if let Some(limit) = request.limit {
            request.limit = Some(limit.min(MAX_RECENT_TRACKS_PAGE_SIZE));
        }
        let response: RecentTracksResponse =
            self.call(methods::USER_GET_RECENT_TRACKS, &request).await?;
        Ok(response.recenttracks)
    }

    /// Get a user's most played artists.
    pub async fn get_top_artists(&self, request: &ChartRequest) -> Result<TopArtists, ScrobbleError> {
        let response: TopArtistsResponse = self.call(methods::USER_GET_TOP_ARTISTS, request).await?;
        Ok(response.topartists)
    }

    /// Get a user's most played tracks.
    pub async fn get_top_tracks(&self, request: &ChartRequest) -> Result<TopTracks, ScrobbleError> {
        let response: TopTracksResponse = self.call(methods::USER_GET_TOP_TRACKS, request).await?;
        Ok(response.toptracks)
    }

    /// Get a user's most played albums.
    pub async fn get_top_albums(&self, request: &ChartRequest) -> Result<TopAlbums, ScrobbleError> {
        let response: TopAlbumsResponse = self.call(methods::USER_GET_TOP_ALBUMS, request).await?;
        Ok(response.topalbums)
    }
}
