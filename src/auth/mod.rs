//! Authentication module
//!
//! WooCommerce REST keys are a consumer key / consumer secret pair. They are
//! sent as HTTP Basic credentials, as `consumer_key` / `consumer_secret`
//! query parameters, or both for servers that strip the Authorization header.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, Location};
