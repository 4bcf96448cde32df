//! User-Agent selection
//!
//! Some hosting providers put WooCommerce behind bot filters that reject
//! library user agents, so requests present a current desktop Chrome
//! string, picked at random per request, unless an override is configured.

use rand::seq::SliceRandom;

const CHROME_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
];

/// User-Agent strategy for outgoing requests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UserAgent {
    /// Random Chrome user agent per request
    #[default]
    Rotating,
    /// Fixed user agent string
    Fixed(String),
}

impl UserAgent {
    /// Build from an optional override
    pub fn from_override(value: Option<String>) -> Self {
        match value {
            Some(agent) => Self::Fixed(agent),
            None => Self::Rotating,
        }
    }

    /// User agent to send with the next request
    pub fn next(&self) -> &str {
        match self {
            Self::Fixed(agent) => agent,
            Self::Rotating => CHROME_AGENTS
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(CHROME_AGENTS[0]),
        }
    }
}
