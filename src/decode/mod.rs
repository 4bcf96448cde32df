//! Response decoding module
//!
//! # Overview
//!
//! Turns a parsed WooCommerce page body into the rows a stream emits. See
//! [`Normalizer`] for the order of operations.

mod normalizer;

pub use normalizer::{
    backfill_replication_key, merge_context, nullify_empty_strings, Normalizer, RecordExtractor,
    DEFAULT_RECORDS_PATH,
};
