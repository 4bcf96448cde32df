//! Stream catalog
//!
//! # Overview
//!
//! The catalog is the static list of WooCommerce streams plus the set the
//! current run emits. Children may be present only to be fetched for their
//! parent's sake; [`Catalog::select`] pulls parents in automatically.

mod schemas;
mod streams;
mod types;

pub use schemas::{build_schema, FieldType};
pub use streams::ALL as WOOCOMMERCE_STREAMS;
pub use types::{ChildContextFn, Context, PostProcessFn, StreamDefinition};

use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde_json::json;
use std::collections::BTreeSet;

/// Ordered set of streams for one run
#[derive(Debug, Clone)]
pub struct Catalog {
    streams: Vec<StreamDefinition>,
    selected: BTreeSet<&'static str>,
}

impl Catalog {
    /// Create a catalog with every stream selected
    pub fn new(streams: Vec<StreamDefinition>) -> Self {
        let selected = streams.iter().map(|s| s.name).collect();
        Self { streams, selected }
    }

    /// All WooCommerce streams
    pub fn woocommerce() -> Self {
        Self::new(WOOCOMMERCE_STREAMS.to_vec())
    }

    /// Streams in sync order
    pub fn streams(&self) -> &[StreamDefinition] {
        &self.streams
    }

    /// Get a stream by name
    pub fn get(&self, name: &str) -> Option<&StreamDefinition> {
        self.streams.iter().find(|s| s.name == name)
    }

    /// Check if a stream's records are emitted
    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    /// Names of the emitted streams
    pub fn selected(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.selected.iter().copied()
    }

    /// Streams without a parent
    pub fn top_level(&self) -> impl Iterator<Item = &StreamDefinition> {
        self.streams.iter().filter(|s| !s.is_child())
    }

    /// Direct children of a stream
    pub fn children_of<'a>(
        &'a self,
        parent: &'a str,
    ) -> impl Iterator<Item = &'a StreamDefinition> + 'a {
        self.streams
            .iter()
            .filter(move |s| s.parent == Some(parent))
    }

    /// Restrict to the named streams, keeping their ancestors for contexts
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let mut selected = BTreeSet::new();
        let mut required = BTreeSet::new();

        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            let stream = self.get(name).ok_or_else(|| Error::StreamNotFound {
                stream: name.to_string(),
            })?;
            selected.insert(stream.name);

            let mut current = Some(stream);
            while let Some(stream) = current {
                required.insert(stream.name);
                current = stream.parent.and_then(|p| self.get(p));
            }
        }

        Ok(Self {
            streams: self
                .streams
                .iter()
                .filter(|s| required.contains(s.name))
                .copied()
                .collect(),
            selected,
        })
    }

    /// Keep only the named streams (e.g. those discovery found)
    pub fn retain(&self, available: &[&str]) -> Self {
        let streams: Vec<StreamDefinition> = self
            .streams
            .iter()
            .filter(|s| available.contains(&s.name))
            .copied()
            .collect();
        let selected = self
            .selected
            .iter()
            .copied()
            .filter(|name| available.contains(name))
            .collect();
        Self { streams, selected }
    }

    /// Number of streams
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Catalog document as written by `discover`
    pub fn to_json(&self) -> JsonValue {
        let entries: Vec<JsonValue> = self
            .streams
            .iter()
            .map(StreamDefinition::catalog_entry)
            .collect();
        json!({ "streams": entries })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::woocommerce()
    }
}
