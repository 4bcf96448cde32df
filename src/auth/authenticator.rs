//! Authenticator implementation
//!
//! Applies the configured credentials to outgoing requests.

use super::types::AuthConfig;
use reqwest::RequestBuilder;

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Get the auth configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config {
            AuthConfig::None => req,

            AuthConfig::Consumer {
                key,
                secret,
                location,
            } => {
                let mut req = req;
                if location.uses_header() {
                    req = req.basic_auth(key, Some(secret));
                }
                if location.uses_query() {
                    req = req.query(&[
                        ("consumer_key", key.as_str()),
                        ("consumer_secret", secret.as_str()),
                    ]);
                }
                req
            }
        }
    }
}
