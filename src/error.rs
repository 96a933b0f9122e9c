//! Error types for the scrobble statistics library.

use thiserror::Error;

/// The main error type for all scrobble-stats operations.
#[derive(Error, Debug)]
pub enum ScrobbleError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Last.fm returned an error payload
    #[error("Last.fm API error: {0}")]
    Api(ApiError),

    /// Last.fm answered with a non-success HTTP status and no error payload
    #[error("Upstream returned HTTP {status}: {body}")]
    UpstreamStatus {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded at the edge
    #[error("Rate limit exceeded, retry after {retry_after_ms:?}ms")]
    RateLimitExceeded {
        /// Suggested wait time in milliseconds before retrying
        retry_after_ms: Option<u64>,
    },

    /// Caller supplied an unusable argument (e.g. an empty username)
    #[error("Validation error: {0}")]
    Validation(String),

    /// No API key configured
    #[error("Missing API key: set LASTFM_API_KEY or configure an ApiKeyProvider")]
    MissingApiKey,
}

impl ScrobbleError {
    /// Whether this error originated from the upstream API or the transport to it.
    ///
    /// Callers use this to decide whether serving stale cached data is appropriate.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ScrobbleError::Http(_)
                | ScrobbleError::HttpMiddleware(_)
                | ScrobbleError::Json(_)
                | ScrobbleError::Api(_)
                | ScrobbleError::UpstreamStatus { .. }
                | ScrobbleError::InvalidResponse(_)
        )
    }
}

/// Last.fm API error codes and messages.
///
/// Last.fm reports failures in the body as `{"error": 6, "message": "User not found"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Numeric error code from Last.fm
    pub code: u32,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl ApiError {
    /// Create a new API error from code and message.
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        self.code == error_codes::RATE_LIMIT_EXCEEDED
    }

    /// Check if the requested user or resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.code == error_codes::INVALID_PARAMETERS && self.message.to_lowercase().contains("not found")
    }

    /// Check if this is an invalid API key error.
    pub fn is_invalid_key(&self) -> bool {
        matches!(
            self.code,
            error_codes::INVALID_API_KEY | error_codes::SUSPENDED_API_KEY
        )
    }

    /// Check if the service is temporarily unavailable.
    pub fn is_service_unavailable(&self) -> bool {
        matches!(
            self.code,
            error_codes::OPERATION_FAILED | error_codes::SERVICE_OFFLINE | error_codes::TEMPORARY_ERROR
        )
    }
}

/// Known Last.fm error codes.
pub mod error_codes {
    pub const INVALID_SERVICE: u32 = 2;
    pub const INVALID_METHOD: u32 = 3;
    pub const AUTHENTICATION_FAILED: u32 = 4;
    pub const INVALID_FORMAT: u32 = 5;
    /// Also returned for unknown users.
    pub const INVALID_PARAMETERS: u32 = 6;
    pub const INVALID_RESOURCE: u32 = 7;
    pub const OPERATION_FAILED: u32 = 8;
    pub const INVALID_API_KEY: u32 = 10;
    pub const SERVICE_OFFLINE: u32 = 11;
    pub const TEMPORARY_ERROR: u32 = 16;
    pub const SUSPENDED_API_KEY: u32 = 26;
    pub const RATE_LIMIT_EXCEEDED: u32 = 29;
}
