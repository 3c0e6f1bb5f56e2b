//! HTTP client for the Together SDK.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::headers;
use arc_swap::ArcSwap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;
use together_resilience::{RetryConfig, RetryPolicy, RetryingTransport};
use url::Url;

/// Client for the Together inference API.
///
/// Cloning is cheap and clones share configuration: changing the base URL
/// or debug flag on one clone is seen by all of them. Each call works from
/// the configuration snapshot that was current when it started.
///
/// # Example
///
/// ```rust,no_run
/// use together_sdk::{ChatCompletionsRequest, Client, Context, Message};
///
/// #[tokio::main]
/// async fn main() -> Result<(), together_sdk::Error> {
///     let client = Client::new("your-api-key")?;
///     let ctx = Context::background();
///
///     let response = client
///         .chat_completions(
///             Some(&ctx),
///             "meta-llama/Llama-3-8b-chat-hf",
///             vec![Message::user("Hello!")],
///             ChatCompletionsRequest::default(),
///         )
///         .await?;
///
///     println!("{}", response.content());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    /// HTTP transport with retry.
    transport: RetryingTransport,
    /// Current configuration snapshot.
    config: ArcSwap<ClientConfig>,
}

impl Client {
    /// Create a client for `api_key` with every other setting at its default.
    ///
    /// # Errors
    /// Returns a configuration error if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client from a complete configuration.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        if config.api_key_value().is_empty() {
            return Err(Error::configuration(
                "invalid credentials: API Token must not be empty",
            ));
        }
        headers::bearer(config.api_key_value())?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {e}")))?;
        let transport = RetryingTransport::new(http, RetryPolicy::new(config.retry.clone()));

        Ok(Self {
            inner: Arc::new(ClientInner {
                transport,
                config: ArcSwap::from_pointee(config),
            }),
        })
    }

    /// The configuration snapshot in effect right now.
    pub fn config(&self) -> Arc<ClientConfig> {
        self.inner.config.load_full()
    }

    /// Point the client at a different base URL.
    ///
    /// Calls already in flight keep the URL they started with.
    pub fn set_base_url(&self, url: impl AsRef<str>) -> Result<()> {
        let url = parse_base_url(url.as_ref())?;
        self.inner.config.rcu(|current| {
            let mut next = ClientConfig::clone(current);
            next.base_url = url.clone();
            next
        });
        Ok(())
    }

    /// Turn redacted request/response dumps on or off.
    pub fn set_debug(&self, debug: bool) {
        self.inner.config.rcu(|current| {
            let mut next = ClientConfig::clone(current);
            next.debug = debug;
            next
        });
    }

    pub(crate) fn transport(&self) -> &RetryingTransport {
        &self.inner.transport
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let config = self.config();
        f.debug_struct("Client")
            .field("base_url", &config.base_url.as_str())
            .field("debug", &config.debug)
            .field("max_retries", &config.retry.max_retries)
            .finish_non_exhaustive()
    }
}

fn parse_base_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| Error::configuration(format!("Invalid base URL '{url}': {e}")))
}

/// Builder for creating a Client.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    api_key: Option<SecretString>,
    base_url: Option<String>,
    user_agent: Option<String>,
    custom_headers: Vec<(String, String)>,
    default_headers: HeaderMap,
    debug: bool,
    retry: RetryConfig,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Create a new client builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(key.into()));
        self
    }

    /// Set the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the user agent. An empty string sends no `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Add a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Add already-parsed headers sent with every request.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        headers::overlay(&mut self.default_headers, &headers);
        self
    }

    /// Enable redacted request/response dumps.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Replace the whole retry configuration.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the maximum number of retries.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.retry.max_retries = retries;
        self
    }

    /// Set the initial retry delay.
    pub fn retry_initial_delay(mut self, delay: Duration) -> Self {
        self.retry.base_delay = delay;
        self
    }

    /// Set the maximum retry delay.
    pub fn retry_max_delay(mut self, delay: Duration) -> Self {
        self.retry.max_delay = delay;
        self
    }

    /// Set the backoff multiplier.
    pub fn retry_multiplier(mut self, multiplier: f64) -> Self {
        self.retry.multiplier = multiplier;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<Client> {
        let api_key = self
            .api_key
            .filter(|key| !key.expose_secret().is_empty())
            .ok_or_else(|| {
                Error::configuration("invalid credentials: API Token must not be empty")
            })?;

        let base_url = parse_base_url(
            self.base_url
                .as_deref()
                .unwrap_or(ClientConfig::DEFAULT_BASE_URL),
        )?;

        let mut default_headers = self.default_headers;
        for (name, value) in &self.custom_headers {
            let header_name = HeaderName::try_from(name.as_str()).map_err(|e| {
                Error::configuration(format!("Invalid header name '{name}': {e}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                Error::configuration(format!("Invalid header value for '{name}': {e}"))
            })?;
            default_headers.append(header_name, header_value);
        }

        let config = ClientConfig {
            api_key,
            base_url,
            user_agent: Some(
                self.user_agent
                    .unwrap_or_else(|| ClientConfig::DEFAULT_USER_AGENT.to_string()),
            )
            .filter(|agent| !agent.is_empty()),
            default_headers,
            debug: self.debug,
            retry: self.retry,
            timeout: self.timeout.unwrap_or(ClientConfig::DEFAULT_TIMEOUT),
            connect_timeout: self
                .connect_timeout
                .unwrap_or(ClientConfig::DEFAULT_CONNECT_TIMEOUT),
        };

        Client::from_config(config)
    }
}
