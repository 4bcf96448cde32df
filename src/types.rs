//! Common types used throughout the tap
//!
//! Shared type aliases and small enums used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Replication Method
// ============================================================================

/// How a stream is replicated between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplicationMethod {
    /// Fetch everything on every run
    #[default]
    FullTable,
    /// Only fetch records modified since the last watermark
    Incremental,
}

// ============================================================================
// Server Dialect
// ============================================================================

/// Query-parameter contract exposed by the target store
///
/// Modern stores (WooCommerce >= the configured threshold) accept an exact
/// `modified_after` filter. Legacy stores only understand `after`, which
/// filters on creation date at day granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    #[default]
    Modern,
    Legacy,
}

impl Dialect {
    /// Check if this is the modern dialect
    pub fn is_modern(&self) -> bool {
        matches!(self, Self::Modern)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Modern => write!(f, "modern"),
            Dialect::Legacy => write!(f, "legacy"),
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}
