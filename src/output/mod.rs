//! Output module
//!
//! Singer-style messages (SCHEMA, RECORD, STATE) and the sinks that
//! receive them.

mod writer;

pub use writer::{MemorySink, RecordSink, SingerMessage, SingerWriter};

#[cfg(test)]
mod tests;
