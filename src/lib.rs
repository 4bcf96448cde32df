// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # tap-woocommerce
//!
//! Incremental extraction of WooCommerce REST collections as Singer
//! messages.
//!
//! ## Features
//!
//! - **Page-based pagination** driven by `X-WP-TotalPages`
//! - **Retry with backoff** for 429, 5xx, transport failures and bad bodies
//! - **Dialect detection**: `modified_after` on modern stores, `after` plus
//!   client-side filtering on legacy ones
//! - **Watermarks** that only move forward, committed per completed stream
//! - **Parent/child streams** (order notes, product variations)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tap_woocommerce::catalog::Catalog;
//! use tap_woocommerce::config::TapConfig;
//! use tap_woocommerce::engine::{discover, SyncEngine};
//! use tap_woocommerce::http::HttpClient;
//! use tap_woocommerce::output::SingerWriter;
//! use tap_woocommerce::state::StateManager;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> tap_woocommerce::Result<()> {
//!     let config = TapConfig::from_file("config.json")?;
//!     let client = HttpClient::with_auth(config.http_config()?, config.auth_config())?;
//!
//!     let catalog = discover(&client, &Catalog::woocommerce()).await?;
//!     let state = StateManager::from_file("state.json")?;
//!
//!     let mut engine = SyncEngine::new(client, config.engine_config()?);
//!     engine.sync(&catalog, &state, &mut SingerWriter::stdout()).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  CLI: check / discover / sync                                │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────────┬──────────────┴───────┬───────────────────────┐
//! │   Catalog    │        Engine        │        Output         │
//! ├──────────────┼──────────────────────┼───────────────────────┤
//! │ Streams      │ Discovery            │ SCHEMA / RECORD       │
//! │ Schemas      │ Version probe        │ STATE                 │
//! │ Hooks        │ Page loop            │                       │
//! └──────────────┴──────────────────────┴───────────────────────┘
//!                               │
//! ┌──────────┬──────────────┬───┴──────────┬────────────────────┐
//! │   HTTP   │  Pagination  │    Decode    │       State        │
//! ├──────────┼──────────────┼──────────────┼────────────────────┤
//! │ Classify │ Page cursor  │ Extract      │ Watermark tracker  │
//! │ Retry    │ TotalPages   │ Normalize    │ Checkpoint store   │
//! │ Throttle │ Loop guard   │ Backfill     │                    │
//! └──────────┴──────────────┴──────────────┴────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the tap
pub mod error;

/// Common types and type aliases
pub mod types;

/// Consumer key authentication
pub mod auth;

/// HTTP client with classification, retry and rate limiting
pub mod http;

/// Page cursor and pagination strategy
pub mod pagination;

/// Record extraction and normalization
pub mod decode;

/// Watermarks and checkpoint persistence
pub mod state;

/// Singer message output
pub mod output;

/// Sync engine, discovery and version probe
pub mod engine;

/// Tap configuration
pub mod config;

/// Path template interpolation
pub mod template;

/// Command-line interface
pub mod cli;

/// JSON schema types
pub mod schema;

/// WooCommerce stream catalog
pub mod catalog;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use catalog::{Catalog, StreamDefinition};
pub use config::TapConfig;
pub use engine::SyncEngine;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
