//! Client configuration for the Together SDK.

use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use together_resilience::RetryConfig;
use url::Url;

/// Immutable configuration snapshot used by one or more calls.
///
/// A [`crate::Client`] holds the current snapshot and swaps in a new one when
/// the base URL or debug flag changes, so a call in flight always sees a
/// consistent configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key for authentication.
    pub(crate) api_key: SecretString,
    /// Base URL of the service.
    pub(crate) base_url: Url,
    /// User agent string; `None` leaves the header unset.
    pub(crate) user_agent: Option<String>,
    /// Headers sent with every request, before per-call headers.
    pub(crate) default_headers: HeaderMap,
    /// Dump redacted requests and responses to the diagnostic log.
    pub(crate) debug: bool,
    /// Retry behavior.
    pub(crate) retry: RetryConfig,
    /// Request timeout duration.
    pub(crate) timeout: Duration,
    /// Connection timeout duration.
    pub(crate) connect_timeout: Duration,
}

impl ClientConfig {
    /// Default base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.together.xyz";
    /// Default request timeout (60 seconds).
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
    /// Default connection timeout (10 seconds).
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default user agent.
    pub const DEFAULT_USER_AGENT: &'static str =
        concat!("together-rust/", env!("CARGO_PKG_VERSION"));

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the API key (exposed for use in requests and redaction).
    pub(crate) fn api_key_value(&self) -> &str {
        self.api_key.expose_secret().as_str()
    }

    /// Get the user agent.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Get the default headers.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Check if debug dumps are enabled.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Get the retry configuration.
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the connection timeout.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Absolute URL for `path`, which is appended verbatim (query included).
    pub(crate) fn endpoint(&self, path: &str) -> std::result::Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}"))
    }
}
