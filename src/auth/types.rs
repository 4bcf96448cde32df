//! Auth configuration types

use serde::{Deserialize, Serialize};

/// Where the credentials are placed on each request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// HTTP Basic `Authorization` header
    #[default]
    Header,
    /// `consumer_key` / `consumer_secret` query parameters
    Query,
    /// Both the header and the query parameters
    HeaderAndQuery,
}

impl Location {
    /// Whether an `Authorization` header is sent
    pub fn uses_header(&self) -> bool {
        matches!(self, Self::Header | Self::HeaderAndQuery)
    }

    /// Whether query parameters are sent
    pub fn uses_query(&self) -> bool {
        matches!(self, Self::Query | Self::HeaderAndQuery)
    }
}

/// Authentication configuration
#[derive(Clone, Default)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// Consumer key / secret pair
    Consumer {
        /// Consumer key (`ck_...`)
        key: String,
        /// Consumer secret (`cs_...`)
        secret: String,
        /// Where to place the credentials
        location: Location,
    },
}

impl AuthConfig {
    /// Create a consumer key config sent as HTTP Basic
    pub fn basic(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::Consumer {
            key: key.into(),
            secret: secret.into(),
            location: Location::Header,
        }
    }

    /// Create a consumer key config with an explicit location
    pub fn consumer(key: impl Into<String>, secret: impl Into<String>, location: Location) -> Self {
        Self::Consumer {
            key: key.into(),
            secret: secret.into(),
            location,
        }
    }
}

// Secrets never reach logs through Debug.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthConfig::None => write!(f, "None"),
            AuthConfig::Consumer { key, location, .. } => f
                .debug_struct("Consumer")
                .field("key", key)
                .field("secret", &"***")
                .field("location", location)
                .finish(),
        }
    }
}
