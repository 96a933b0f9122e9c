//! Widget feeds: currently playing and top charts.

use futures_util::future::join_all;

use crate::cache::keys;
use crate::error::ScrobbleError;
use crate::lastfm::{
    ChartArtist, ChartItem, ChartRequest, RecentTrack, RecentTracksRequest, ScrobbleSource,
    TrackInfoRequest, image_of_size,
};
use crate::service::types::{
    DEFAULT_IMAGE, Link, NowPlaying, TopAlbum, TopArtist, TopItem, TopTrack, TrackSummary,
};
use crate::service::{StatsService, validate_username};
use crate::types::{ImageSize, Period};

/// Map a recent-tracks entry to the shape the now-playing widget renders.
///
/// The image is the second entry of the image list (Last.fm's `medium`).
pub fn summarize_recent_track(track: &RecentTrack) -> TrackSummary {
    let image = track
        .image
        .get(1)
        .map(|image| image.url.as_str())
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_IMAGE);

    let album = track
        .album
        .as_ref()
        .map(|album| Link {
            name: album.name().to_string(),
            url: album.url.clone().unwrap_or_default(),
        })
        .unwrap_or_default();

    TrackSummary {
        name: track.name.clone(),
        url: track.url.clone().unwrap_or_else(|| "#".to_string()),
        artist: Link {
            name: track.artist.name().to_string(),
            url: track.artist.url.clone().unwrap_or_default(),
        },
        album,
        image: image.to_string(),
    }
}

/// Map a chart artist, using its `large` image.
pub fn top_artist_entry(artist: &ChartArtist) -> TopArtist {
    TopArtist {
        name: artist.name.clone(),
        url: artist.url.clone().unwrap_or_default(),
        playcount: artist.playcount,
        image: large_image_or_default(&artist.image),
    }
}

/// Map a chart track or album with the given image.
pub fn top_item_entry(item: &ChartItem, image: String) -> TopItem {
    TopItem {
        name: item.name.clone(),
        url: item.url.clone().unwrap_or_default(),
        playcount: item.playcount,
        artist: Link {
            name: item.artist.name().to_string(),
            url: item.artist.url.clone().unwrap_or_default(),
        },
        image,
    }
}

fn large_image_or_default(images: &[crate::lastfm::Image]) -> String {
    image_of_size(images, ImageSize::Large)
        .unwrap_or(DEFAULT_IMAGE)
        .to_string()
}

impl<S: ScrobbleSource> StatsService<S> {
    /// The in-progress or most recently finished track of `username`.
    pub async fn get_currently_playing(&self, username: &str) -> Result<NowPlaying, ScrobbleError> {
        let username = validate_username(username)?;
        let key = keys::currently_playing(username);
        if let Some(cached) = self.caches.now_playing.get(&key).await {
            return Ok(cached);
        }

        let request = RecentTracksRequest::new(username).limit(1);
        let recent = self.source.get_recent_tracks(&request).await?;

        let result = match recent.track.first() {
            Some(track) => NowPlaying {
                now_playing: track.is_now_playing(),
                track: Some(summarize_recent_track(track)),
            },
            None => NowPlaying::idle(),
        };

        self.caches
            .now_playing
            .set(key, result.clone(), self.ttls.now_playing)
            .await;
        Ok(result)
    }

    /// Most played artists of `username` over `period`.
    ///
    /// `limit` is clamped into the configured artist range.
    pub async fn get_top_artists(
        &self,
        username: &str,
        limit: u32,
        period: Period,
    ) -> Result<Vec<TopArtist>, ScrobbleError> {
        let username = validate_username(username)?;
        let limit = self.feed_limits.artists.clamp(limit);
        let key = keys::top_artists(username, limit, period);
        if let Some(cached) = self.caches.top_artists.get(&key).await {
            return Ok(cached);
        }

        let request = ChartRequest::new(username).limit(limit).period(period);
        let chart = self.source.get_top_artists(&request).await?;
        let artists: Vec<TopArtist> = chart.artist.iter().map(top_artist_entry).collect();

        self.caches
            .top_artists
            .set(key, artists.clone(), self.ttls.chart)
            .await;
        Ok(artists)
    }

    /// Most played albums of `username` over `period`.
    ///
    /// `limit` is clamped into the configured album range.
    pub async fn get_top_albums(
        &self,
        username: &str,
        limit: u32,
        period: Period,
    ) -> Result<Vec<TopAlbum>, ScrobbleError> {
        let username = validate_username(username)?;
        let limit = self.feed_limits.albums.clamp(limit);
        let key = keys::top_albums(username, limit, period);
        if let Some(cached) = self.caches.top_albums.get(&key).await {
            return Ok(cached);
        }

        let request = ChartRequest::new(username).limit(limit).period(period);
        let chart = self.source.get_top_albums(&request).await?;
        let albums: Vec<TopAlbum> = chart
            .album
            .iter()
            .map(|album| top_item_entry(album, large_image_or_default(&album.image)))
            .collect();

        self.caches
            .top_albums
            .set(key, albums.clone(), self.ttls.chart)
            .await;
        Ok(albums)
    }

    /// Most played tracks of `username` over `period`.
    ///
    /// The chart carries no artwork, so each track's album image is looked up
    /// concurrently. A failed lookup yields the default image for that track
    /// only.
    pub async fn get_top_tracks(
        &self,
        username: &str,
        limit: u32,
        period: Period,
    ) -> Result<Vec<TopTrack>, ScrobbleError> {
        let username = validate_username(username)?;
        let limit = self.feed_limits.tracks.clamp(limit);
        let key = keys::top_tracks(username, limit, period);
        if let Some(cached) = self.caches.top_tracks.get(&key).await {
            return Ok(cached);
        }

        let request = ChartRequest::new(username).limit(limit).period(period);
        let chart = self.source.get_top_tracks(&request).await?;

        let images = join_all(chart.track.iter().map(|track| self.album_image(track))).await;
        let tracks: Vec<TopTrack> = chart
            .track
            .iter()
            .zip(images)
            .map(|(track, image)| top_item_entry(track, image))
            .collect();

        self.caches
            .top_tracks
            .set(key, tracks.clone(), self.ttls.chart)
            .await;
        Ok(tracks)
    }

    async fn album_image(&self, track: &ChartItem) -> String {
        let request = TrackInfoRequest::new(track.artist.name(), &track.name);
        match self.source.get_track_info(&request).await {
            Ok(info) => info
                .album
                .as_ref()
                .and_then(|album| image_of_size(&album.image, ImageSize::Large))
                .unwrap_or(DEFAULT_IMAGE)
                .to_string(),
            Err(err) => {
                tracing::debug!(track = %track.name, error = %err, "track artwork lookup failed");
                DEFAULT_IMAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lastfm::{RecentTracks, TopArtists, TopTracks};

    #[test]
    fn test_summarize_now_playing_track() {
        let page: RecentTracks = serde_json::from_value(serde_json::json!({
            "track": [{
                "name": "Song",
                "url": "https://www.last.fm/music/Band/_/Song",
                "artist": {"#text": "Band"},
                "album": {"#text": "Record"},
                "image": [
                    {"size": "small", "#text": "s.png"},
                    {"size": "medium", "#text": "m.png"}
                ],
                "@attr": {"nowplaying": "true"}
            }],
            "@attr": {"page": "1", "perPage": "1", "totalPages": "1", "total": "1"}
        }))
        .unwrap();

        let summary = summarize_recent_track(&page.track[0]);
        assert_eq!(summary.name, "Song");
        assert_eq!(summary.artist.name, "Band");
        assert_eq!(summary.artist.url, "");
        assert_eq!(summary.album.name, "Record");
        assert_eq!(summary.image, "m.png");
    }

    #[test]
    fn test_summarize_defaults() {
        let page: RecentTracks = serde_json::from_value(serde_json::json!({
            "track": {"name": "Bare", "image": [{"size": "small", "#text": "s.png"}]},
            "@attr": {"page": "1", "perPage": "1", "totalPages": "1", "total": "1"}
        }))
        .unwrap();

        let summary = summarize_recent_track(&page.track[0]);
        assert_eq!(summary.url, "#");
        assert_eq!(summary.album, Link::default());
        assert_eq!(summary.image, DEFAULT_IMAGE);
    }

    #[test]
    fn test_top_artist_entry_uses_large_image() {
        let chart: TopArtists = serde_json::from_value(serde_json::json!({
            "artist": [
                {
                    "name": "With Art",
                    "playcount": "120",
                    "url": "https://www.last.fm/music/With+Art",
                    "image": [
                        {"size": "medium", "#text": "m.png"},
                        {"size": "large", "#text": "l.png"}
                    ]
                },
                {"name": "No Art", "playcount": "7", "image": [{"size": "large", "#text": ""}]}
            ]
        }))
        .unwrap();

        let entries: Vec<TopArtist> = chart.artist.iter().map(top_artist_entry).collect();
        assert_eq!(entries[0].image, "l.png");
        assert_eq!(entries[0].playcount, 120);
        assert_eq!(entries[1].image, DEFAULT_IMAGE);
        assert_eq!(entries[1].url, "");
    }

    #[test]
    fn test_top_item_entry() {
        let chart: TopTracks = serde_json::from_value(serde_json::json!({
            "track": {
                "name": "Hit",
                "playcount": "33",
                "artist": {"name": "Band", "url": "https://www.last.fm/music/Band"}
            }
        }))
        .unwrap();

        let entry = top_item_entry(&chart.track[0], "cover.png".to_string());
        assert_eq!(entry.name, "Hit");
        assert_eq!(entry.playcount, 33);
        assert_eq!(entry.artist.name, "Band");
        assert_eq!(entry.artist.url, "https://www.last.fm/music/Band");
        assert_eq!(entry.image, "cover.png");
    }
}
