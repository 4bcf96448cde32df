//! Engine types
//!
//! Run configuration, per-stream run state and sync statistics.

use crate::catalog::{Context, StreamDefinition};
use crate::decode::Normalizer;
use crate::error::Result;
use crate::state::{parse_timestamp, ReplicationTracker};
use chrono::NaiveDateTime;
use std::collections::VecDeque;

/// Settings that shape a sync run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Watermark for streams without a bookmark
    pub start_date: NaiveDateTime,
    /// Lookback applied to legacy `after` filters
    pub lookback_days: i64,
    /// Skip the version probe and assume a legacy store
    pub use_old_version: bool,
    /// First (major, minor) version treated as modern
    pub version_threshold: (u32, u32),
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            start_date: parse_timestamp("2000-01-01T00:00:00").unwrap_or_default(),
            lookback_days: 60,
            use_old_version: false,
            version_threshold: (5, 8),
        }
    }
}

impl EngineConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start date
    #[must_use]
    pub fn with_start_date(mut self, start_date: NaiveDateTime) -> Self {
        self.start_date = start_date;
        self
    }

    /// Set the legacy lookback window
    #[must_use]
    pub fn with_lookback_days(mut self, days: i64) -> Self {
        self.lookback_days = days;
        self
    }

    /// Force the legacy dialect
    #[must_use]
    pub fn with_old_version(mut self, use_old_version: bool) -> Self {
        self.use_old_version = use_old_version;
        self
    }

    /// Set the modern version threshold
    #[must_use]
    pub fn with_version_threshold(mut self, major: u32, minor: u32) -> Self {
        self.version_threshold = (major, minor);
        self
    }
}

/// Mutable state for one stream while it drains
///
/// Created when the stream starts and dropped when it ends; nothing here
/// outlives the stream except the committed watermark.
#[derive(Debug)]
pub struct StreamRun {
    /// Stream being synced
    pub stream: StreamDefinition,
    /// Record normalizer for the stream
    pub normalizer: Normalizer,
    /// Watermark bookkeeping, for incremental streams
    pub tracker: Option<ReplicationTracker>,
    /// Whether records are written to the sink
    pub selected: bool,
    /// Whether child contexts are collected from records
    pub collect_children: bool,
    /// Contexts for this stream's children
    pub child_contexts: VecDeque<Context>,
    /// SCHEMA message already written
    pub schema_written: bool,
    /// Records written
    pub records: usize,
    /// Pages fetched successfully
    pub pages: usize,
    /// Pages skipped in degraded mode
    pub degraded_pages: usize,
}

impl StreamRun {
    /// Create the run state for a stream
    pub fn new(
        stream: StreamDefinition,
        tracker: Option<ReplicationTracker>,
        selected: bool,
        collect_children: bool,
    ) -> Result<Self> {
        Ok(Self {
            stream,
            normalizer: Normalizer::for_stream(&stream)?,
            tracker,
            selected,
            collect_children,
            child_contexts: VecDeque::new(),
            schema_written: false,
            records: 0,
            pages: 0,
            degraded_pages: 0,
        })
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Total records written
    pub records_synced: usize,
    /// Total pages fetched
    pub pages_fetched: usize,
    /// Pages skipped under `ignore_server_errors`
    pub degraded_pages: usize,
    /// Streams that completed
    pub streams_synced: usize,
    /// Streams that failed
    pub failed_streams: Vec<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a finished stream into the totals
    pub fn add_run(&mut self, run: &StreamRun) {
        self.records_synced += run.records;
        self.pages_fetched += run.pages;
        self.degraded_pages += run.degraded_pages;
    }

    /// Count a completed stream
    pub fn add_stream(&mut self) {
        self.streams_synced += 1;
    }

    /// Count a failed stream
    pub fn add_failure(&mut self, stream: impl Into<String>) {
        self.failed_streams.push(stream.into());
    }

    /// Check if any stream failed
    pub fn has_failures(&self) -> bool {
        !self.failed_streams.is_empty()
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
