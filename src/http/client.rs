//! HTTP client with retry and rate limiting
//!
//! Every request goes through the same pipeline:
//! - wait on the optional rate limiter
//! - attach content type, user agent and credentials
//! - classify the response (see [`classify`](super::classify))
//! - retry transient failures with exponential backoff

use super::classify::{classify, BodyShape, Classification};
use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::retry::{retry, Retried, RetryPolicy};
use super::user_agent::UserAgent;
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Retry budget and backoff
    pub retry: RetryPolicy,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent strategy
    pub user_agent: UserAgent,
    /// Treat every 4xx/5xx except 401 as an ignorable empty response
    pub ignore_server_errors: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(300),
            retry: RetryPolicy::default(),
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: UserAgent::default(),
            ignore_server_errors: false,
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the retry policy
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent strategy
    pub fn user_agent(mut self, agent: UserAgent) -> Self {
        self.config.user_agent = agent;
        self
    }

    /// Tolerate error statuses other than 401
    pub fn ignore_server_errors(mut self, ignore: bool) -> Self {
        self.config.ignore_server_errors = ignore;
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: HashMap<String, String>,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
    /// Override max retries for this request
    pub max_retries: Option<u32>,
    /// Expected body shape
    pub shape: BodyShape,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add several query parameters
    #[must_use]
    pub fn queries<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in params {
            self.query.insert(key.into(), value.into());
        }
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set max retries (0 = single attempt)
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the expected body shape
    #[must_use]
    pub fn shape(mut self, shape: BodyShape) -> Self {
        self.shape = shape;
        self
    }
}

/// A successful response
#[derive(Debug, Clone)]
pub struct Page {
    /// HTTP status
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl Page {
    /// Get a header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Result of one request that did not fail
#[derive(Debug, Clone)]
pub enum Fetched {
    /// Response with a usable body
    Page(Page),
    /// Error status tolerated under `ignore_server_errors`
    Ignored {
        /// HTTP status of the ignored response
        status: u16,
    },
}

impl Fetched {
    /// Get the page, if any
    pub fn page(&self) -> Option<&Page> {
        match self {
            Self::Page(page) => Some(page),
            Self::Ignored { .. } => None,
        }
    }

    /// Take the page, if any
    pub fn into_page(self) -> Option<Page> {
        match self {
            Self::Page(page) => Some(page),
            Self::Ignored { .. } => None,
        }
    }
}

/// HTTP client with retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            authenticator: Authenticator::default(),
            rate_limiter,
        })
    }

    /// Create a client with authentication
    pub fn with_auth(config: HttpClientConfig, auth_config: AuthConfig) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.authenticator = Authenticator::new(auth_config);
        Ok(client)
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// GET a resource, retrying transient failures
    pub async fn get(&self, path: &str, config: &RequestConfig) -> Result<Retried<Fetched>> {
        let policy = match config.max_retries {
            Some(retries) => self.config.retry.with_max_attempts(retries.saturating_add(1)),
            None => self.config.retry,
        };

        retry(&policy, |_| self.send_once(path, config)).await
    }

    /// Issue a single GET and classify the outcome
    pub async fn send_once(&self, path: &str, config: &RequestConfig) -> Result<Fetched> {
        let url = self.build_url(path);

        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let mut req = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, self.config.user_agent.next());

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        for (key, value) in &config.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if !config.query.is_empty() {
            req = req.query(&config.query);
        }

        if let Some(timeout) = config.timeout {
            req = req.timeout(timeout);
        }

        req = self.authenticator.apply(req);

        let response = req.send().await.map_err(|e| Error::transport(path, e))?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let text = response
            .text()
            .await
            .map_err(|e| Error::transport(path, e))?;

        match classify(
            path,
            status,
            &text,
            config.shape,
            self.config.ignore_server_errors,
        ) {
            Classification::Success(body) => {
                debug!("GET {} -> {}", url, status);
                Ok(Fetched::Page(Page {
                    status,
                    headers,
                    body,
                }))
            }
            Classification::Ignorable { status } => {
                warn!("Ignoring HTTP {} from '{}'", status, path);
                Ok(Fetched::Ignored { status })
            }
            Classification::Retryable(e) | Classification::Fatal(e) => Err(e),
        }
    }

    /// Build full URL from path
    pub(crate) fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("auth", self.authenticator.config())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
