//! Last.fm REST API endpoint constants.

/// Base URL for the Last.fm 2.0 REST API.
pub const LASTFM_BASE_URL: &str = "https://ws.audioscrobbler.com/2.0/";

/// API methods, passed in the `method` query parameter.
pub mod methods {
    /// Profile information, including total play count and registration time.
    pub const USER_GET_INFO: &str = "user.getinfo";
    /// Listening history, newest first. Includes the currently playing track.
    pub const USER_GET_RECENT_TRACKS: &str = "user.getrecenttracks";
    /// Most played artists for a period.
    pub const USER_GET_TOP_ARTISTS: &str = "user.gettopartists";
    /// Most played tracks for a period.
    pub const USER_GET_TOP_TRACKS: &str = "user.gettoptracks";
    /// Most played albums for a period.
    pub const USER_GET_TOP_ALBUMS: &str = "user.gettopalbums";
    /// Track metadata, including album artwork.
    pub const TRACK_GET_INFO: &str = "track.getInfo";
}

/// Largest page size `user.getrecenttracks` accepts.
pub const MAX_RECENT_TRACKS_PAGE_SIZE: u32 = 200;
