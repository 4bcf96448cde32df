//! JSON Schema module
//!
//! Minimal JSON Schema document model used to describe each stream in the
//! catalog and in SCHEMA messages.

mod types;

pub use types::{JsonSchema, JsonType, JsonTypeOrArray, SchemaProperty};
