//! `track.*` methods.

use crate::error::ScrobbleError;
use crate::lastfm::LastfmClient;
use crate::lastfm::endpoints::methods;
use crate::lastfm::types::{TrackInfo, TrackInfoRequest, TrackInfoResponse};

impl LastfmClient {
    /// Look up a track by artist and title.
    ///
    /// Used to find album artwork, which the top tracks chart does not carry.
    pub async fn get_track_info(&self, request: &TrackInfoRequest) -> Result<TrackInfo, ScrobbleError> {
        let response: TrackInfoResponse = self.call(methods::TRACK_GET_INFO, request).await?;
        Ok(response.track)
    }
}
