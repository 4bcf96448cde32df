//! State management module
//!
//! Tracks per-stream replication watermarks between sync runs.
//!
//! # Overview
//!
//! The state module provides:
//! - `State` / `Bookmark` - Persisted bookmark map
//! - `CheckpointStore` - Watermark storage seam used by the sync engine
//! - `StateManager` - File-based (or in-memory) `CheckpointStore`
//! - `ReplicationTracker` - In-run watermark filter and high-water mark

mod manager;
mod tracker;
mod types;

pub use manager::StateManager;
pub use tracker::{format_timestamp, parse_timestamp, ReplicationTracker, SENTINEL, TIMESTAMP_FORMAT};
pub use types::{Bookmark, CheckpointStore, State};
