//! State manager implementation
//!
//! Provides file-based state persistence with atomic writes.

use super::tracker::parse_timestamp;
use super::types::{Bookmark, CheckpointStore, State};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// State manager for persisting and loading state
#[derive(Debug)]
pub struct StateManager {
    /// Path to the state file
    path: PathBuf,
    /// Current state (cached)
    state: Arc<RwLock<State>>,
    /// Whether to save on every update
    auto_save: bool,
}

impl StateManager {
    /// Create a new state manager with the given path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: Arc::new(RwLock::new(State::new())),
            auto_save: true,
        }
    }

    /// Create an in-memory state manager (no file persistence)
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            state: Arc::new(RwLock::new(State::new())),
            auto_save: false,
        }
    }

    /// Create a state manager from a file, loading existing state if present
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::state(format!("Failed to read state file: {e}")))?;
            parse_state(&contents)?
        } else {
            State::new()
        };

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(state)),
            auto_save: true,
        })
    }

    /// Create a state manager from inline JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let state = parse_state(json)?;

        Ok(Self {
            path: PathBuf::new(),
            state: Arc::new(RwLock::new(state)),
            auto_save: false,
        })
    }

    /// Save current state to file
    pub async fn save(&self) -> Result<()> {
        if self.is_in_memory() {
            return Ok(());
        }

        let contents = self.to_json_pretty().await?;

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::state(format!("Failed to write state file: {e}")))?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::state(format!("Failed to rename state file: {e}")))?;

        Ok(())
    }

    /// Get a read lock on the current state
    pub async fn state(&self) -> tokio::sync::RwLockReadGuard<'_, State> {
        self.state.read().await
    }

    /// Export state as JSON string
    pub async fn to_json(&self) -> Result<String> {
        let state = self.state.read().await;
        serde_json::to_string(&*state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))
    }

    /// Export state as pretty-printed JSON string
    pub async fn to_json_pretty(&self) -> Result<String> {
        let state = self.state.read().await;
        serde_json::to_string_pretty(&*state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))
    }

    /// Get the state file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if using in-memory mode
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}

#[async_trait]
impl CheckpointStore for StateManager {
    async fn get_watermark(&self, stream: &str) -> Option<String> {
        let state = self.state.read().await;
        state.get_watermark(stream).map(ToString::to_string)
    }

    async fn set_watermark(&self, stream: &str, replication_key: &str, value: &str) -> Result<()> {
        {
            let mut state = self.state.write().await;
            let current = state.get_watermark(stream).and_then(parse_timestamp);
            if let (Some(current), Some(new)) = (current, parse_timestamp(value)) {
                if new < current {
                    debug!(
                        "Ignoring watermark regression for '{}': {} < {}",
                        stream, value, current
                    );
                    return Ok(());
                }
            }
            state.set_bookmark(stream, Bookmark::new(replication_key, value));
        }

        if self.auto_save {
            self.save().await?;
        }

        Ok(())
    }

    async fn snapshot(&self) -> State {
        self.state.read().await.clone()
    }
}

impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            state: Arc::clone(&self.state),
            auto_save: self.auto_save,
        }
    }
}

fn parse_state(contents: &str) -> Result<State> {
    if contents.trim().is_empty() {
        return Ok(State::new());
    }
    serde_json::from_str(contents).map_err(|e| Error::state(format!("Failed to parse state: {e}")))
}
