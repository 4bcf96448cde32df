//! Record sinks
//!
//! The engine hands every normalized record to a [`RecordSink`]. The CLI
//! writes Singer JSON lines to stdout; tests collect messages in memory.

use crate::catalog::StreamDefinition;
use crate::error::{Error, Result};
use crate::state::State;
use crate::types::{JsonObject, JsonValue};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::io::Write;

/// One line of tap output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SingerMessage {
    /// Stream schema, written before the stream's first record
    Schema {
        /// Stream name
        stream: String,
        /// JSON schema of the records
        schema: JsonValue,
        /// Primary key fields
        key_properties: Vec<String>,
        /// Replication key, if any
        #[serde(skip_serializing_if = "Vec::is_empty")]
        bookmark_properties: Vec<String>,
    },
    /// A normalized record
    Record {
        /// Stream name
        stream: String,
        /// The record
        record: JsonObject,
        /// Extraction time, RFC 3339
        time_extracted: String,
    },
    /// Bookmarks after a completed stream
    State {
        /// Full bookmark map
        value: State,
    },
}

impl SingerMessage {
    /// Create a schema message for a stream
    pub fn schema(stream: &StreamDefinition) -> Self {
        Self::Schema {
            stream: stream.name.to_string(),
            schema: stream.schema().to_json(),
            key_properties: stream.primary_keys.iter().map(ToString::to_string).collect(),
            bookmark_properties: stream
                .replication_key
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Create a record message stamped with the current time
    pub fn record(stream: impl Into<String>, record: JsonObject) -> Self {
        Self::Record {
            stream: stream.into(),
            record,
            time_extracted: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// Create a state message
    pub fn state(value: State) -> Self {
        Self::State { value }
    }

    /// Stream the message refers to
    pub fn stream(&self) -> Option<&str> {
        match self {
            Self::Schema { stream, .. } | Self::Record { stream, .. } => Some(stream),
            Self::State { .. } => None,
        }
    }
}

/// Destination for extracted records
pub trait RecordSink {
    /// Announce a stream's schema
    fn write_schema(&mut self, stream: &StreamDefinition) -> Result<()>;

    /// Emit one record
    fn write_record(&mut self, stream: &str, record: JsonObject) -> Result<()>;

    /// Emit the current bookmarks
    fn write_state(&mut self, state: &State) -> Result<()>;
}

/// Writes Singer messages as JSON lines
#[derive(Debug)]
pub struct SingerWriter<W: Write> {
    out: W,
    lines: usize,
}

impl SingerWriter<std::io::Stdout> {
    /// Writer on stdout
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> SingerWriter<W> {
    /// Create a writer over any output
    pub fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    /// Number of lines written
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Give back the underlying output
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Serialize and write one message
    pub fn write_message(&mut self, message: &SingerMessage) -> Result<()> {
        let line = serde_json::to_string(message)
            .map_err(|e| Error::output(format!("Failed to serialize message: {e}")))?;
        writeln!(self.out, "{line}")?;
        self.lines += 1;
        Ok(())
    }

    /// Flush the output
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> RecordSink for SingerWriter<W> {
    fn write_schema(&mut self, stream: &StreamDefinition) -> Result<()> {
        self.write_message(&SingerMessage::schema(stream))
    }

    fn write_record(&mut self, stream: &str, record: JsonObject) -> Result<()> {
        self.write_message(&SingerMessage::record(stream, record))
    }

    fn write_state(&mut self, state: &State) -> Result<()> {
        self.write_message(&SingerMessage::state(state.clone()))?;
        self.flush()
    }
}

/// Keeps every message in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    messages: Vec<SingerMessage>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in emission order
    pub fn messages(&self) -> &[SingerMessage] {
        &self.messages
    }

    /// Records written for a stream
    pub fn records(&self, stream: &str) -> Vec<&JsonObject> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                SingerMessage::Record {
                    stream: s, record, ..
                } if s == stream => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Streams that received a SCHEMA message, in order
    pub fn schemas(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                SingerMessage::Schema { stream, .. } => Some(stream.as_str()),
                _ => None,
            })
            .collect()
    }

    /// State messages in order
    pub fn states(&self) -> Vec<&State> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                SingerMessage::State { value } => Some(value),
                _ => None,
            })
            .collect()
    }

    /// Total number of records
    pub fn record_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| matches!(m, SingerMessage::Record { .. }))
            .count()
    }
}

impl RecordSink for MemorySink {
    fn write_schema(&mut self, stream: &StreamDefinition) -> Result<()> {
        self.messages.push(SingerMessage::schema(stream));
        Ok(())
    }

    fn write_record(&mut self, stream: &str, record: JsonObject) -> Result<()> {
        self.messages.push(SingerMessage::record(stream, record));
        Ok(())
    }

    fn write_state(&mut self, state: &State) -> Result<()> {
        self.messages.push(SingerMessage::state(state.clone()));
        Ok(())
    }
}
