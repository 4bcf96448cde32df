//! Stream definition types

use super::schemas::{build_schema, FieldType};
use crate::error::Result;
use crate::schema::JsonSchema;
use crate::template;
use crate::types::{JsonObject, JsonValue, ReplicationMethod};
use serde_json::json;

/// Values handed from a parent record to a child stream
pub type Context = JsonObject;

/// Derive a child context from a parent record; `None` skips the children
pub type ChildContextFn = fn(&JsonObject) -> Option<Context>;

/// Final per-record hook; `None` drops the record
pub type PostProcessFn = fn(JsonObject, Option<&Context>) -> Option<JsonObject>;

/// Static description of one WooCommerce resource collection
#[derive(Debug, Clone, Copy)]
pub struct StreamDefinition {
    /// Stream name
    pub name: &'static str,
    /// Path under the API base, may contain `{placeholders}`
    pub path: &'static str,
    /// Primary key fields
    pub primary_keys: &'static [&'static str],
    /// Replication key; `None` means full refresh
    pub replication_key: Option<&'static str>,
    /// Parent stream name
    pub parent: Option<&'static str>,
    /// JSONPath selecting records in a page body
    pub records_path: &'static str,
    /// Child context derivation
    pub child_context: Option<ChildContextFn>,
    /// Record post-processing
    pub post_process: Option<PostProcessFn>,
    /// Top-level fields
    pub fields: &'static [(&'static str, FieldType)],
}

impl StreamDefinition {
    /// Replication method implied by the replication key
    pub fn replication_method(&self) -> ReplicationMethod {
        if self.replication_key.is_some() {
            ReplicationMethod::Incremental
        } else {
            ReplicationMethod::FullTable
        }
    }

    /// Check if this stream replicates incrementally
    pub fn is_incremental(&self) -> bool {
        self.replication_key.is_some()
    }

    /// Check if this stream depends on a parent
    pub fn is_child(&self) -> bool {
        self.parent.is_some()
    }

    /// Resolve the request path for a context
    pub fn render_path(&self, context: Option<&Context>) -> Result<String> {
        match context {
            Some(ctx) => template::render(self.path, ctx),
            None => template::render(self.path, &JsonObject::new()),
        }
    }

    /// JSON schema for emitted records
    pub fn schema(&self) -> JsonSchema {
        build_schema(self.fields)
    }

    /// Catalog entry as written by `discover`
    pub fn catalog_entry(&self) -> JsonValue {
        json!({
            "tap_stream_id": self.name,
            "stream": self.name,
            "key_properties": self.primary_keys,
            "replication_key": self.replication_key,
            "replication_method": self.replication_method(),
            "parent_stream": self.parent,
            "schema": self.schema().to_json(),
        })
    }
}
