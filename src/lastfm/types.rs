//! Request and response types for the Last.fm API.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use time::OffsetDateTime;

use crate::types::serde_helpers::{empty_string_as_none, lenient_u64, one_or_many};
use crate::types::{ImageSize, Period};

/// An entry of a Last.fm `image` array.
#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    /// Image URL, empty when Last.fm has no artwork.
    #[serde(rename = "#text", default)]
    pub url: String,
    /// Size label.
    #[serde(default)]
    pub size: Option<ImageSize>,
}

/// Find the URL of the first non-empty image with the given size.
pub fn image_of_size(images: &[Image], size: ImageSize) -> Option<&str> {
    images
        .iter()
        .find(|image| image.size == Some(size) && !image.url.is_empty())
        .map(|image| image.url.as_str())
}

/// A reference to an artist or album embedded in another object.
///
/// Recent-track payloads use `#text` for the name while chart payloads use
/// `name`; both are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityRef {
    #[serde(rename = "#text", default)]
    text: Option<String>,
    #[serde(default)]
    name: Option<String>,
    /// Last.fm page for the entity, when present.
    #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
    pub url: Option<String>,
}

impl EntityRef {
    /// The entity name, or an empty string when Last.fm sent none.
    pub fn name(&self) -> &str {
        self.text
            .as_deref()
            .filter(|text| !text.is_empty())
            .or(self.name.as_deref())
            .unwrap_or_default()
    }
}

/// Pagination metadata from an `@attr` object.
///
/// Last.fm always sends these counters as strings.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAttr {
    /// Current page, starting at 1.
    #[serde_as(as = "DisplayFromStr")]
    pub page: u64,
    /// Items per page.
    #[serde_as(as = "DisplayFromStr")]
    pub per_page: u64,
    /// Total number of pages.
    #[serde_as(as = "DisplayFromStr")]
    pub total_pages: u64,
    /// Total number of items across all pages.
    #[serde_as(as = "DisplayFromStr")]
    pub total: u64,
}

impl PageAttr {
    /// Whether pages after this one exist.
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

// ========== user.getinfo ==========

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserInfoResponse {
    pub user: UserInfo,
}

/// Profile information returned by `user.getinfo`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    /// Username.
    pub name: String,
    /// Total scrobbles.
    #[serde(deserialize_with = "lenient_u64::deserialize")]
    pub playcount: u64,
    /// Registration time.
    pub registered: Registered,
    /// Profile page.
    #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
    pub url: Option<String>,
    /// Avatar images.
    #[serde(default, deserialize_with = "one_or_many::deserialize")]
    pub image: Vec<Image>,
}

/// Registration timestamp.
#[derive(Debug, Clone, Deserialize)]
pub struct Registered {
    /// Seconds since the Unix epoch.
    #[serde(deserialize_with = "lenient_u64::deserialize")]
    pub unixtime: u64,
}

// ========== user.getrecenttracks ==========

/// Request parameters for `user.getrecenttracks`.
#[derive(Debug, Clone, Serialize)]
pub struct RecentTracksRequest {
    /// Username.
    pub user: String,
    /// Items per page (Last.fm caps this at 200).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Page number, starting at 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl RecentTracksRequest {
    /// Create a new request for a user.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            limit: None,
            page: None,
        }
    }

    /// Set the page size.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the page number.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RecentTracksResponse {
    pub recenttracks: RecentTracks,
}

/// One page of listening history.
#[derive(Debug, Clone, Deserialize)]
pub struct RecentTracks {
    /// Tracks, newest first. A currently playing track comes first.
    #[serde(default, deserialize_with = "one_or_many::deserialize")]
    pub track: Vec<RecentTrack>,
    /// Pagination metadata.
    #[serde(rename = "@attr")]
    pub attr: PageAttr,
}

/// A listening event from `user.getrecenttracks`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecentTrack {
    /// Track title.
    #[serde(default)]
    pub name: String,
    /// Last.fm track page.
    #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
    pub url: Option<String>,
    /// Track artist.
    #[serde(default)]
    pub artist: EntityRef,
    /// Album, if known.
    #[serde(default)]
    pub album: Option<EntityRef>,
    /// Artwork.
    #[serde(default, deserialize_with = "one_or_many::deserialize")]
    pub image: Vec<Image>,
    /// Completion time. Absent for the currently playing track.
    #[serde(default)]
    pub date: Option<ScrobbleDate>,
    #[serde(rename = "@attr", default)]
    attr: Option<RecentTrackAttr>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RecentTrackAttr {
    #[serde(default)]
    nowplaying: Option<String>,
}

/// Completion time of a scrobble.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrobbleDate {
    /// Seconds since the Unix epoch.
    #[serde(deserialize_with = "lenient_u64::deserialize")]
    pub uts: u64,
}

impl RecentTrack {
    /// Whether this is the in-progress track rather than a completed scrobble.
    pub fn is_now_playing(&self) -> bool {
        self.attr
            .as_ref()
            .and_then(|attr| attr.nowplaying.as_deref())
            == Some("true")
    }

    /// When the scrobble completed, or `None` for the currently playing track.
    pub fn scrobbled_at(&self) -> Option<OffsetDateTime> {
        let uts = i64::try_from(self.date.as_ref()?.uts).ok()?;
        OffsetDateTime::from_unix_timestamp(uts).ok()
    }
}

// ========== chart methods ==========

/// Request parameters for `user.gettopartists`, `user.gettoptracks` and `user.gettopalbums`.
#[derive(Debug, Clone, Serialize)]
pub struct ChartRequest {
    /// Username.
    pub user: String,
    /// Number of entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Time range.
    pub period: Period,
}

impl ChartRequest {
    /// Create a new request for a user covering all time.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            limit: None,
            period: Period::Overall,
        }
    }

    /// Set the number of entries.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the time range.
    pub fn period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TopArtistsResponse {
    pub topartists: TopArtists,
}

/// Response of `user.gettopartists`.
#[derive(Debug, Clone, Deserialize)]
pub struct TopArtists {
    /// Artists, most played first.
    #[serde(default, deserialize_with = "one_or_many::deserialize")]
    pub artist: Vec<ChartArtist>,
    /// Pagination metadata.
    #[serde(rename = "@attr", default)]
    pub attr: Option<PageAttr>,
}

/// An artist in a chart.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartArtist {
    /// Artist name.
    pub name: String,
    /// Plays in the requested period.
    #[serde(default, deserialize_with = "lenient_u64::deserialize")]
    pub playcount: u64,
    /// Last.fm artist page.
    #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
    pub url: Option<String>,
    /// Artwork.
    #[serde(default, deserialize_with = "one_or_many::deserialize")]
    pub image: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TopTracksResponse {
    pub toptracks: TopTracks,
}

/// Response of `user.gettoptracks`.
#[derive(Debug, Clone, Deserialize)]
pub struct TopTracks {
    /// Tracks, most played first.
    #[serde(default, deserialize_with = "one_or_many::deserialize")]
    pub track: Vec<ChartItem>,
    /// Pagination metadata.
    #[serde(rename = "@attr", default)]
    pub attr: Option<PageAttr>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TopAlbumsResponse {
    pub topalbums: TopAlbums,
}

/// Response of `user.gettopalbums`.
#[derive(Debug, Clone, Deserialize)]
pub struct TopAlbums {
    /// Albums, most played first.
    #[serde(default, deserialize_with = "one_or_many::deserialize")]
    pub album: Vec<ChartItem>,
    /// Pagination metadata.
    #[serde(rename = "@attr", default)]
    pub attr: Option<PageAttr>,
}

/// A track or album in a chart, credited to an artist.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartItem {
    /// Track or album title.
    pub name: String,
    /// Plays in the requested period.
    #[serde(default, deserialize_with = "lenient_u64::deserialize")]
    pub playcount: u64,
    /// Last.fm page.
    #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
    pub url: Option<String>,
    /// Credited artist.
    #[serde(default)]
    pub artist: EntityRef,
    /// Artwork.
    #[serde(default, deserialize_with = "one_or_many::deserialize")]
    pub image: Vec<Image>,
}

// ========== track.getInfo ==========

/// Request parameters for `track.getInfo`.
#[derive(Debug, Clone, Serialize)]
pub struct TrackInfoRequest {
    /// Artist name.
    pub artist: String,
    /// Track title.
    pub track: String,
}

impl TrackInfoRequest {
    /// Create a new lookup by artist and title.
    pub fn new(artist: impl Into<String>, track: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            track: track.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TrackInfoResponse {
    pub track: TrackInfo,
}

/// Track metadata returned by `track.getInfo`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackInfo {
    /// Track title.
    pub name: String,
    /// Album the track appears on, if known.
    #[serde(default)]
    pub album: Option<TrackAlbum>,
}

/// Album details embedded in [`TrackInfo`].
#[derive(Debug, Clone, Deserialize)]
pub struct TrackAlbum {
    /// Album title.
    #[serde(default)]
    pub title: Option<String>,
    /// Album artwork.
    #[serde(default, deserialize_with = "one_or_many::deserialize")]
    pub image: Vec<Image>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_tracks_now_playing_and_dates() {
        let json = serde_json::json!({
            "track": [
                {
                    "name": "Playing",
                    "artist": {"mbid": "", "#text": "Band"},
                    "album": {"mbid": "", "#text": ""},
                    "image": [{"size": "small", "#text": ""}],
                    "@attr": {"nowplaying": "true"}
                },
                {
                    "name": "Done",
                    "artist": {"mbid": "", "#text": "Band"},
                    "date": {"uts": "1704412800", "#text": "05 Jan 2024, 00:00"}
                }
            ],
            "@attr": {"user": "alice", "page": "1", "perPage": "200", "totalPages": "3", "total": "450"}
        });

        let page: RecentTracks = serde_json::from_value(json).unwrap();
        assert_eq!(page.track.len(), 2);
        assert!(page.track[0].is_now_playing());
        assert!(page.track[0].scrobbled_at().is_none());
        assert!(!page.track[1].is_now_playing());
        assert_eq!(
            page.track[1].scrobbled_at().unwrap().unix_timestamp(),
            1_704_412_800
        );
        assert_eq!(page.track[1].artist.name(), "Band");
        assert!(page.attr.has_more());
        assert_eq!(page.attr.total_pages, 3);
    }

    #[test]
    fn test_entity_ref_name_variants() {
        let by_text: EntityRef = serde_json::from_value(serde_json::json!({"#text": "A"})).unwrap();
        let by_name: EntityRef =
            serde_json::from_value(serde_json::json!({"name": "B", "url": "https://x"})).unwrap();
        assert_eq!(by_text.name(), "A");
        assert_eq!(by_name.name(), "B");
        assert_eq!(by_name.url.as_deref(), Some("https://x"));
        assert_eq!(EntityRef::default().name(), "");
    }

    #[test]
    fn test_image_of_size() {
        let images: Vec<Image> = serde_json::from_value(serde_json::json!([
            {"size": "small", "#text": "s.png"},
            {"size": "large", "#text": ""},
            {"size": "extralarge", "#text": "xl.png"}
        ]))
        .unwrap();

        assert_eq!(image_of_size(&images, ImageSize::Small), Some("s.png"));
        // Empty URLs count as missing.
        assert_eq!(image_of_size(&images, ImageSize::Large), None);
    }

    #[test]
    fn test_chart_request_serialization() {
        let request = ChartRequest::new("alice").limit(5).period(Period::OneMonth);
        let query = serde_urlencoded::to_string(&request).unwrap();
        assert_eq!(query, "user=alice&limit=5&period=1month");
    }

    #[test]
    fn test_recent_tracks_request_serialization() {
        let request = RecentTracksRequest::new("alice").limit(200).page(3);
        let query = serde_urlencoded::to_string(&request).unwrap();
        assert_eq!(query, "user=alice&limit=200&page=3");
    }
}
