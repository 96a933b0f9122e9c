//! # Scrobble Stats
//!
//! Listening statistics and widget feeds for Last.fm users.
//!
//! ## Features
//!
//! - Total scrobbles and average scrobbles per day
//! - Current listening streak computed from paged history
//! - Currently playing track and top artists, tracks and albums
//! - In-memory TTL caching for every upstream result
//! - Fixed-window per-client rate limiting for the widget edge
//! - Typed async client for the Last.fm REST API
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scrobble_stats::config::Config;
//! use scrobble_stats::service::StatsService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env();
//!     let service = StatsService::from_config(&config);
//!
//!     let stats = service.get_user_stats("rj").await?;
//!     println!("{:?}", stats);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod lastfm;
pub mod rate_limit;
pub mod service;
pub mod types;

// Re-export commonly used types at crate root
pub use config::Config;
pub use error::ScrobbleError;
pub use lastfm::{LastfmClient, ScrobbleSource};
pub use service::{StatsService, StreakResult, UserStats};
pub use types::common::Period;

/// Result type alias using ScrobbleError
pub type Result<T> = std::result::Result<T, ScrobbleError>;
