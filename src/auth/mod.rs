//! API key management for the Last.fm API.
//!
//! Last.fm read-only methods only need an API key passed as a query
//! parameter. The key is kept in a [`secrecy::SecretString`] so it never
//! shows up in `Debug` output or logs.

mod credentials;

pub use credentials::{ApiKey, ApiKeyProvider, EnvApiKey, StaticApiKey};
