//! API key storage and providers.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// Environment variable read by [`EnvApiKey`].
pub const API_KEY_VAR: &str = "LASTFM_API_KEY";

/// A Last.fm API key.
#[derive(Clone)]
pub struct ApiKey {
    key: SecretString,
}

impl ApiKey {
    /// Wrap a raw API key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: SecretString::from(key.into()),
        }
    }

    /// Get the key for building a request.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_secret(&self) -> &str {
        self.key.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey").field("key", &"[REDACTED]").finish()
    }
}

/// Trait for providing the API key.
///
/// Implement this trait to customize how the key is retrieved,
/// for example from a secrets manager.
pub trait ApiKeyProvider: Send + Sync {
    /// Get the API key.
    fn api_key(&self) -> &ApiKey;
}

/// Provider that holds the key directly.
#[derive(Clone)]
pub struct StaticApiKey {
    key: ApiKey,
}

impl StaticApiKey {
    /// Create a new static key provider.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: ApiKey::new(key),
        }
    }
}

impl ApiKeyProvider for StaticApiKey {
    fn api_key(&self) -> &ApiKey {
        &self.key
    }
}

impl ApiKeyProvider for Arc<StaticApiKey> {
    fn api_key(&self) -> &ApiKey {
        &self.key
    }
}

/// Provider that reads the key from an environment variable.
///
/// By default, reads from `LASTFM_API_KEY`.
pub struct EnvApiKey {
    key: ApiKey,
}

impl EnvApiKey {
    /// Try to read the key from `LASTFM_API_KEY`.
    ///
    /// Returns `None` if the variable is unset or empty.
    pub fn try_from_env() -> Option<Self> {
        Self::try_from_env_var(API_KEY_VAR)
    }

    /// Try to read the key from a custom environment variable.
    ///
    /// Returns `None` if the variable is unset or empty.
    pub fn try_from_env_var(var: &str) -> Option<Self> {
        let key = std::env::var(var).ok().filter(|key| !key.trim().is_empty())?;
        Some(Self {
            key: ApiKey::new(key),
        })
    }
}

impl ApiKeyProvider for EnvApiKey {
    fn api_key(&self) -> &ApiKey {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_debug_redacted() {
        let key = ApiKey::new("super_secret");
        let debug_str = format!("{:?}", key);
        assert!(!debug_str.contains("super_secret"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_static_api_key() {
        let provider = StaticApiKey::new("abc123");
        assert_eq!(provider.api_key().expose_secret(), "abc123");
    }

    #[test]
    fn test_env_api_key_missing_var() {
        assert!(EnvApiKey::try_from_env_var("SCROBBLE_STATS_TEST_UNSET_VAR").is_none());
    }
}
