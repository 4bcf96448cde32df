//! Replication watermark tracking
//!
//! Timestamps are compared as naive wall-clock values in the store's local
//! time, matching how WooCommerce reports `date_created` / `date_modified`.

use crate::types::{Dialect, JsonValue};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

/// Format used for filters, bookmarks and backfilled values
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Replication key value for records with no usable date
pub const SENTINEL: &str = "1970-01-01T00:00:00";

/// Parse a timestamp in any of the shapes WooCommerce and configs use
///
/// Offsets are dropped, keeping the wall-clock time.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Format a timestamp as `%Y-%m-%dT%H:%M:%S`
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_value(value: &JsonValue) -> Option<NaiveDateTime> {
    value.as_str().and_then(parse_timestamp)
}

/// Watermark bookkeeping for one stream run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicationTracker {
    watermark: NaiveDateTime,
    lookback_days: i64,
    high_water: Option<NaiveDateTime>,
}

impl ReplicationTracker {
    /// Create a tracker starting at `watermark`
    pub fn new(watermark: NaiveDateTime, lookback_days: i64) -> Self {
        Self {
            watermark,
            lookback_days,
            high_water: None,
        }
    }

    /// Start from a stored bookmark, falling back to `start`
    pub fn resume(stored: Option<&str>, start: NaiveDateTime, lookback_days: i64) -> Self {
        let watermark = match stored {
            Some(value) => parse_timestamp(value).unwrap_or_else(|| {
                tracing::warn!("Ignoring unparsable bookmark '{}'", value);
                start
            }),
            None => start,
        };
        Self::new(watermark, lookback_days)
    }

    /// Watermark this run started from
    pub fn watermark(&self) -> NaiveDateTime {
        self.watermark
    }

    /// Lookback window applied to legacy filters
    pub fn lookback_days(&self) -> i64 {
        self.lookback_days
    }

    /// Server-side filter parameter for the dialect
    ///
    /// Legacy stores only filter on creation date, so the window is widened
    /// by the lookback and the rest is filtered client-side.
    pub fn filter_param(&self, dialect: Dialect) -> (&'static str, String) {
        match dialect {
            Dialect::Modern => ("modified_after", format_timestamp(&self.watermark)),
            Dialect::Legacy => {
                let after = Duration::try_days(self.lookback_days)
                    .and_then(|lookback| self.watermark.checked_sub_signed(lookback))
                    .unwrap_or(NaiveDateTime::MIN);
                ("after", format_timestamp(&after))
            }
        }
    }

    /// Whether a replication key value is newer than the watermark
    ///
    /// Values that do not parse as timestamps are kept.
    pub fn is_after_watermark(&self, value: &JsonValue) -> bool {
        parse_value(value).map_or(true, |ts| ts > self.watermark)
    }

    /// Record a replication key value from an emitted record
    pub fn observe(&mut self, value: &JsonValue) {
        if let Some(ts) = parse_value(value) {
            if self.high_water.map_or(true, |hw| ts > hw) {
                self.high_water = Some(ts);
            }
        }
    }

    /// Highest value observed this run
    pub fn high_water(&self) -> Option<NaiveDateTime> {
        self.high_water
    }

    /// Watermark to persist when the stream completes
    pub fn next_watermark(&self) -> NaiveDateTime {
        match self.high_water {
            Some(hw) if hw > self.watermark => hw,
            _ => self.watermark,
        }
    }
}
