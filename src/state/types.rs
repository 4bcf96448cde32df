//! State types for tracking sync progress
//!
//! Serialized as `{"bookmarks": {"<stream>": {"replication_key": ...,
//! "replication_key_value": ...}}}` and persisted between runs.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete state for the tap
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Per-stream bookmarks
    #[serde(default)]
    pub bookmarks: BTreeMap<String, Bookmark>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get bookmark for a stream
    pub fn get_bookmark(&self, stream: &str) -> Option<&Bookmark> {
        self.bookmarks.get(stream)
    }

    /// Get the watermark value for a stream
    pub fn get_watermark(&self, stream: &str) -> Option<&str> {
        self.bookmarks
            .get(stream)
            .map(|b| b.replication_key_value.as_str())
    }

    /// Set bookmark for a stream
    pub fn set_bookmark(&mut self, stream: &str, bookmark: Bookmark) {
        self.bookmarks.insert(stream.to_string(), bookmark);
    }
}

/// Replication bookmark for one stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Field the watermark refers to
    pub replication_key: String,
    /// Highest value seen, `%Y-%m-%dT%H:%M:%S`
    pub replication_key_value: String,
}

impl Bookmark {
    /// Create a new bookmark
    pub fn new(replication_key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            replication_key: replication_key.into(),
            replication_key_value: value.into(),
        }
    }
}

/// Persistent watermark storage
///
/// Read once when a stream starts and written once when it completes.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Stored watermark for a stream
    async fn get_watermark(&self, stream: &str) -> Option<String>;

    /// Store a new watermark; values older than the stored one are ignored
    async fn set_watermark(&self, stream: &str, replication_key: &str, value: &str)
        -> Result<()>;

    /// Copy of the full state
    async fn snapshot(&self) -> State;
}
