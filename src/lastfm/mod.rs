//! Last.fm REST API client.
//!
//! Only the read-only methods needed for statistics and widget feeds are
//! covered. None of them require a session or request signing; the API key
//! is enough.
//!
//! ## Endpoints
//!
//! - `user.getinfo`: total scrobbles and registration time
//! - `user.getrecenttracks`: paged listening history
//! - `user.gettopartists`, `user.gettoptracks`, `user.gettopalbums`: charts
//! - `track.getInfo`: album artwork lookup

mod client;
pub mod endpoints;
mod track;
mod traits;
pub mod types;
mod user;

pub use client::{LastfmClient, LastfmClientBuilder};
pub use traits::ScrobbleSource;
pub use types::*;
