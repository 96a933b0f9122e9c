//! Last.fm REST API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use reqwest_tracing::TracingMiddleware;
use serde::Deserialize;
use url::Url;

use crate::auth::{ApiKeyProvider, EnvApiKey};
use crate::error::{ApiError, ScrobbleError};
use crate::lastfm::endpoints::LASTFM_BASE_URL;
use crate::lastfm::traits::ScrobbleSource;
use crate::lastfm::types::{
    ChartRequest, RecentTracks, RecentTracksRequest, TopAlbums, TopArtists, TopTracks, TrackInfo,
    TrackInfoRequest, UserInfo,
};

/// The Last.fm REST API client.
///
/// Every call is a `GET` against the 2.0 endpoint with the method name, the
/// API key and `format=json` added to the query string. Failed calls are not
/// retried unless [`LastfmClientBuilder::max_retries`] is set.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use scrobble_stats::auth::StaticApiKey;
/// use scrobble_stats::lastfm::LastfmClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = LastfmClient::builder()
///         .api_key(Arc::new(StaticApiKey::new("your_api_key")))
///         .build();
///
///     let user = client.get_user_info("rj").await?;
///     println!("{} has {} scrobbles", user.name, user.playcount);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct LastfmClient {
    http_client: ClientWithMiddleware,
    base_url: String,
    api_key: Option<Arc<dyn ApiKeyProvider>>,
}

impl LastfmClient {
    /// Create a client that reads its API key from `LASTFM_API_KEY`.
    ///
    /// Calls fail with [`ScrobbleError::MissingApiKey`] if the variable is unset.
    pub fn new() -> Self {
        let builder = Self::builder();
        match EnvApiKey::try_from_env() {
            Some(key) => builder.api_key(Arc::new(key)).build(),
            None => builder.build(),
        }
    }

    /// Create a new client builder.
    pub fn builder() -> LastfmClientBuilder {
        LastfmClientBuilder::new()
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Call an API method with extra query parameters.
    pub(crate) async fn call<T, Q>(&self, method: &str, params: &Q) -> Result<T, ScrobbleError>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let provider = self.api_key.as_ref().ok_or(ScrobbleError::MissingApiKey)?;

        let mut url = Url::parse(&self.base_url)?;
        url.query_pairs_mut()
            .append_pair("method", method)
            .append_pair("api_key", provider.api_key().expose_secret())
            .append_pair("format", "json");

        let extra = serde_urlencoded::to_string(params)
            .map_err(|e| ScrobbleError::InvalidResponse(e.to_string()))?;
        if !extra.is_empty() {
            let query = format!("{}&{}", url.query().unwrap_or_default(), extra);
            url.set_query(Some(&query));
        }

        tracing::debug!(method, "calling Last.fm");
        let response = self.http_client.get(url).send().await?;
        self.parse_response(response).await
    }

    /// Parse a response from the Last.fm API.
    async fn parse_response<T>(&self, response: reqwest::Response) -> Result<T, ScrobbleError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        let body = response.text().await?;

        // Last.fm reports errors in the body, sometimes with a 200 status.
        if let Ok(error) = serde_json::from_str::<LastfmErrorBody>(&body) {
            let api_error = ApiError::new(error.error, error.message);
            tracing::warn!(status = status.as_u16(), %api_error, "Last.fm returned an error");
            return Err(ScrobbleError::Api(api_error));
        }

        if !status.is_success() {
            return Err(ScrobbleError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            ScrobbleError::InvalidResponse(format!("Failed to parse response: {}. Body: {}", e, body))
        })
    }
}

impl Default for LastfmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LastfmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LastfmClient")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

/// Builder for [`LastfmClient`].
pub struct LastfmClientBuilder {
    base_url: String,
    api_key: Option<Arc<dyn ApiKeyProvider>>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    max_retries: u32,
}

impl LastfmClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: LASTFM_BASE_URL.to_string(),
            api_key: None,
            user_agent: None,
            timeout: None,
            max_retries: 0,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API key provider.
    pub fn api_key(mut self, api_key: Arc<dyn ApiKeyProvider>) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set a per-request timeout. No timeout is applied by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Retry transient failures up to `retries` times with exponential backoff.
    ///
    /// Defaults to 0: failures reach the caller on the first attempt.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Build the client.
    pub fn build(self) -> LastfmClient {
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("scrobble-stats/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("scrobble-stats"));
        headers.insert(USER_AGENT, header_value);

        let mut reqwest_builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            reqwest_builder = reqwest_builder.timeout(timeout);
        }
        let reqwest_client = reqwest_builder
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let mut middleware = ClientBuilder::new(reqwest_client).with(TracingMiddleware::default());
        if self.max_retries > 0 {
            let retry_policy =
                ExponentialBackoff::builder().build_with_max_retries(self.max_retries);
            middleware = middleware.with(RetryTransientMiddleware::new_with_policy(retry_policy));
        }

        LastfmClient {
            http_client: middleware.build(),
            base_url: self.base_url,
            api_key: self.api_key,
        }
    }
}

impl Default for LastfmClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Error body returned by Last.fm.
#[derive(Debug, Deserialize)]
struct LastfmErrorBody {
    error: u32,
    message: String,
}

// ScrobbleSource trait implementation.

impl ScrobbleSource for LastfmClient {
    async fn get_user_info(&self, username: &str) -> Result<UserInfo, ScrobbleError> {
        LastfmClient::get_user_info(self, username).await
    }

    async fn get_recent_tracks(
        &self,
        request: &RecentTracksRequest,
    ) -> Result<RecentTracks, ScrobbleError> {
        LastfmClient::get_recent_tracks(self, request).await
    }

    async fn get_top_artists(&self, request: &ChartRequest) -> Result<TopArtists, ScrobbleError> {
        LastfmClient::get_top_artists(self, request).await
    }

    async fn get_top_tracks(&self, request: &ChartRequest) -> Result<TopTracks, ScrobbleError> {
        LastfmClient::get_top_tracks(self, request).await
    }

    async fn get_top_albums(&self, request: &ChartRequest) -> Result<TopAlbums, ScrobbleError> {
        LastfmClient::get_top_albums(self, request).await
    }

    async fn get_track_info(&self, request: &TrackInfoRequest) -> Result<TrackInfo, ScrobbleError> {
        LastfmClient::get_track_info(self, request).await
    }
}
