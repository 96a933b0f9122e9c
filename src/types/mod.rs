//! Common types used across the scrobble-stats library.

pub mod common;
pub mod serde_helpers;

pub use common::*;
