use std::time::Duration;

/// Default Spotify Web API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";
/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime configuration describing how to reach the Spotify Web API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyConfig {
    /// API root, without trailing slash.
    pub api_base_url: String,
    /// Upper bound for a single request, connect included.
    pub request_timeout: Duration,
}

impl SpotifyConfig {
    /// Construct a configuration from explicit values.
    pub fn new(api_base_url: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            request_timeout,
        }
    }
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT)
    }
}
