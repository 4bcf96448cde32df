//! Tap configuration
//!
//! Loaded from a JSON file (`--config`) or inline JSON (`--config-json`).
//! Only `site_url`, `consumer_key` and `consumer_secret` are required.

use crate::auth::{AuthConfig, Location};
use crate::engine::{parse_version, EngineConfig};
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig, RetryPolicy, UserAgent};
use crate::state::parse_timestamp;
use crate::types::OptionStringExt;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// REST namespace appended to the site URL
pub const API_PATH: &str = "wp-json/wc/v3/";

/// Complete tap configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct TapConfig {
    /// Store root, e.g. `https://shop.example.com`
    #[serde(default)]
    pub site_url: String,

    /// REST consumer key (`ck_...`)
    #[serde(default)]
    pub consumer_key: String,

    /// REST consumer secret (`cs_...`)
    #[serde(default)]
    pub consumer_secret: String,

    /// Initial watermark for streams without a bookmark
    #[serde(default = "default_start_date")]
    pub start_date: String,

    /// Lookback window in days for legacy stores
    #[serde(default = "default_check_modify_date")]
    pub check_modify_date: u32,

    /// Treat error statuses (except 401) as empty pages
    #[serde(default)]
    pub ignore_server_errors: bool,

    /// Skip the version probe and assume a legacy store
    #[serde(default)]
    pub use_old_version: bool,

    /// Fixed User-Agent instead of rotating browser strings
    #[serde(default)]
    pub user_agent: Option<String>,

    /// First WooCommerce version that supports `modified_after`
    #[serde(default = "default_version_threshold")]
    pub modern_version_threshold: String,

    /// Also send credentials as query parameters
    #[serde(default)]
    pub auth_in_query: bool,

    /// Per-request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Attempts per request, including the first
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Optional client-side throttle
    #[serde(default)]
    pub max_requests_per_second: Option<u32>,

    /// Streams to sync (all when absent)
    #[serde(default)]
    pub streams: Option<Vec<String>>,
}

fn default_start_date() -> String {
    "2000-01-01T00:00:00Z".to_string()
}

fn default_check_modify_date() -> u32 {
    60
}

fn default_version_threshold() -> String {
    "5.8".to_string()
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_max_retries() -> u32 {
    10
}

fn default_backoff_base_ms() -> u64 {
    1000
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            site_url: String::new(),
            consumer_key: String::new(),
            consumer_secret: String::new(),
            start_date: default_start_date(),
            check_modify_date: default_check_modify_date(),
            ignore_server_errors: false,
            use_old_version: false,
            user_agent: None,
            modern_version_threshold: default_version_threshold(),
            auth_in_query: false,
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            max_requests_per_second: None,
            streams: None,
        }
    }
}

impl TapConfig {
    /// Create a config with the required fields
    pub fn new(
        site_url: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        Self {
            site_url: site_url.into(),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            ..Self::default()
        }
    }

    /// Load and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    /// Parse and validate inline JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check required fields and value formats
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("site_url", &self.site_url),
            ("consumer_key", &self.consumer_key),
            ("consumer_secret", &self.consumer_secret),
        ] {
            if value.trim().is_empty() {
                return Err(Error::missing_field(field));
            }
        }

        self.api_base_url()?;
        self.start_timestamp()?;
        self.version_threshold()?;

        if self.max_retries == 0 {
            return Err(Error::invalid_value("max_retries", "must be at least 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::invalid_value(
                "request_timeout_secs",
                "must be at least 1",
            ));
        }
        if self.max_requests_per_second == Some(0) {
            return Err(Error::invalid_value(
                "max_requests_per_second",
                "must be at least 1",
            ));
        }

        Ok(())
    }

    /// REST API root, always ending in `/wp-json/wc/v3/`
    pub fn api_base_url(&self) -> Result<String> {
        let site = self.site_url.trim().trim_end_matches('/');
        let url = url::Url::parse(site)
            .map_err(|e| Error::invalid_value("site_url", format!("{site}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "site_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        Ok(format!("{site}/{API_PATH}"))
    }

    /// Parsed `start_date`
    pub fn start_timestamp(&self) -> Result<NaiveDateTime> {
        parse_timestamp(&self.start_date).ok_or_else(|| {
            Error::invalid_value("start_date", format!("'{}' is not a timestamp", self.start_date))
        })
    }

    /// Parsed `modern_version_threshold` as (major, minor)
    pub fn version_threshold(&self) -> Result<(u32, u32)> {
        parse_version(&self.modern_version_threshold).ok_or_else(|| {
            Error::invalid_value(
                "modern_version_threshold",
                format!("'{}' is not a version", self.modern_version_threshold),
            )
        })
    }

    /// Credentials for the HTTP client
    pub fn auth_config(&self) -> AuthConfig {
        let location = if self.auth_in_query {
            Location::HeaderAndQuery
        } else {
            Location::Header
        };
        AuthConfig::consumer(&self.consumer_key, &self.consumer_secret, location)
    }

    /// HTTP client settings
    pub fn http_config(&self) -> Result<HttpClientConfig> {
        let retry = RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.backoff_base_ms),
        );

        let mut builder = HttpClientConfig::builder()
            .base_url(self.api_base_url()?)
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .retry(retry)
            .user_agent(UserAgent::from_override(
                self.user_agent.clone().none_if_empty(),
            ))
            .ignore_server_errors(self.ignore_server_errors);

        if let Some(rps) = self.max_requests_per_second {
            builder = builder.rate_limit(RateLimiterConfig::per_second(rps));
        }

        Ok(builder.build())
    }

    /// Sync engine settings
    pub fn engine_config(&self) -> Result<EngineConfig> {
        Ok(EngineConfig {
            start_date: self.start_timestamp()?,
            lookback_days: i64::from(self.check_modify_date),
            use_old_version: self.use_old_version,
            version_threshold: self.version_threshold()?,
        })
    }
}

impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapConfig")
            .field("site_url", &self.site_url)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"***")
            .field("start_date", &self.start_date)
            .field("check_modify_date", &self.check_modify_date)
            .field("ignore_server_errors", &self.ignore_server_errors)
            .field("use_old_version", &self.use_old_version)
            .field("user_agent", &self.user_agent)
            .field("modern_version_threshold", &self.modern_version_threshold)
            .field("auth_in_query", &self.auth_in_query)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .field("max_requests_per_second", &self.max_requests_per_second)
            .field("streams", &self.streams)
            .finish()
    }
}
