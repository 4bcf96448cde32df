//! Record normalization
//!
//! WooCommerce is inconsistent about empty values and occasionally omits
//! `date_modified`. Every page goes through the same steps before records
//! are emitted: extract, blank strings to null, backfill the replication
//! key, drop stale rows (legacy stores only), then merge the parent context
//! and run the stream's post-processing hook.

use crate::catalog::{Context, PostProcessFn, StreamDefinition};
use crate::error::{Error, Result};
use crate::state::{ReplicationTracker, SENTINEL};
use crate::types::{JsonObject, JsonValue};
use jsonpath_rust::JsonPath;
use tracing::debug;

/// Default record path: every element of a top-level array
pub const DEFAULT_RECORDS_PATH: &str = "$[*]";

/// Pulls record candidates out of a response body with a JSONPath
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    path: String,
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self {
            path: DEFAULT_RECORDS_PATH.to_string(),
        }
    }
}

impl RecordExtractor {
    /// Create an extractor, validating the path up front
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if !is_whole_array(&path) {
            JsonPath::<JsonValue>::try_from(path.as_str())
                .map_err(|e| Error::json_path(format!("Invalid JSONPath '{path}': {e}")))?;
        }
        Ok(Self { path })
    }

    /// The configured path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Extract matching values from a response body
    pub fn extract(&self, body: &JsonValue) -> Result<Vec<JsonValue>> {
        if is_whole_array(&self.path) {
            return Ok(match body {
                JsonValue::Array(items) => items.clone(),
                JsonValue::Null => Vec::new(),
                other => vec![other.clone()],
            });
        }

        let jp = JsonPath::try_from(self.path.as_str())
            .map_err(|e| Error::json_path(format!("Invalid JSONPath '{}': {e}", self.path)))?;

        Ok(match jp.find(body) {
            JsonValue::Array(items) => items,
            JsonValue::Null => Vec::new(),
            other => vec![other],
        })
    }
}

fn is_whole_array(path: &str) -> bool {
    matches!(path, "$[*]" | "$.*" | "$")
}

/// Replace every `""` with `null`, recursing into objects and arrays
pub fn nullify_empty_strings(value: &mut JsonValue) {
    if value.as_str().is_some_and(str::is_empty) {
        *value = JsonValue::Null;
        return;
    }

    match value {
        JsonValue::Object(map) => map.values_mut().for_each(nullify_empty_strings),
        JsonValue::Array(items) => items.iter_mut().for_each(nullify_empty_strings),
        _ => {}
    }
}

/// Fill a missing or null replication key from `date_created`, else a sentinel
///
/// Returns `true` when the sentinel was written.
pub fn backfill_replication_key(record: &mut JsonObject, key: &str) -> bool {
    let present = record.get(key).is_some_and(|v| !v.is_null());
    if present {
        return false;
    }

    let (fallback, sentinel) = match record.get("date_created") {
        Some(value) if !value.is_null() => (value.clone(), false),
        _ => (JsonValue::String(SENTINEL.to_string()), true),
    };
    record.insert(key.to_string(), fallback);
    sentinel
}

/// Merge a parent context into a record; context values win
pub fn merge_context(record: &mut JsonObject, context: &Context) {
    for (key, value) in context {
        record.insert(key.clone(), value.clone());
    }
}

/// Per-stream record normalizer
#[derive(Debug, Clone)]
pub struct Normalizer {
    extractor: RecordExtractor,
    replication_key: Option<&'static str>,
    post_process: Option<PostProcessFn>,
}

impl Normalizer {
    /// Build the normalizer for a stream definition
    pub fn for_stream(stream: &StreamDefinition) -> Result<Self> {
        Ok(Self {
            extractor: RecordExtractor::new(stream.records_path)?,
            replication_key: stream.replication_key,
            post_process: stream.post_process,
        })
    }

    /// Normalize one page body into emit-ready records
    ///
    /// `legacy_filter` is set only when the store speaks the legacy dialect;
    /// records at or before its watermark are dropped. Records that needed
    /// the sentinel are never dropped by it.
    pub fn normalize_page(
        &self,
        body: &JsonValue,
        context: Option<&Context>,
        legacy_filter: Option<&ReplicationTracker>,
    ) -> Result<Vec<JsonObject>> {
        let candidates = self.extractor.extract(body)?;
        let total = candidates.len();
        let mut records = Vec::with_capacity(total);

        for mut candidate in candidates {
            nullify_empty_strings(&mut candidate);

            let mut record = match candidate {
                JsonValue::Object(record) => record,
                other => {
                    debug!("Skipping non-object record: {}", other);
                    continue;
                }
            };

            if let Some(key) = self.replication_key {
                let sentinel = backfill_replication_key(&mut record, key);

                // Records without any timestamp always pass the legacy filter
                if let Some(tracker) = legacy_filter.filter(|_| !sentinel) {
                    let keep = record
                        .get(key)
                        .map_or(true, |value| tracker.is_after_watermark(value));
                    if !keep {
                        continue;
                    }
                }
            }

            if let Some(context) = context {
                merge_context(&mut record, context);
            }

            let record = match self.post_process {
                Some(hook) => match hook(record, context) {
                    Some(record) => record,
                    None => continue,
                },
                None => record,
            };

            records.push(record);
        }

        if records.len() < total {
            debug!(
                "Normalized {} of {} records from '{}'",
                records.len(),
                total,
                self.extractor.path()
            );
        }

        Ok(records)
    }
}
