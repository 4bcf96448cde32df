//! Stream discovery
//!
//! Not every store exposes every collection (subscriptions need an
//! extension, for one). Each top-level stream is tried with a one-record
//! fetch; children follow their parent.

use crate::catalog::{Catalog, StreamDefinition};
use crate::decode::DEFAULT_RECORDS_PATH;
use crate::error::Result;
use crate::http::{BodyShape, Fetched, HttpClient, RequestConfig};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Body shape expected from a stream's endpoint
pub(crate) fn body_shape(stream: &StreamDefinition) -> BodyShape {
    if stream.records_path == DEFAULT_RECORDS_PATH {
        BodyShape::Array
    } else {
        BodyShape::Any
    }
}

/// Retries allowed for one existence check
pub const AVAILABILITY_RETRIES: u32 = 1;

/// Check whether one top-level stream answers
///
/// Authentication failures are returned; anything else just makes the
/// stream unavailable.
pub async fn is_available(client: &HttpClient, stream: &StreamDefinition) -> Result<bool> {
    let path = stream.render_path(None)?;
    let request = RequestConfig::new()
        .query("per_page", "1")
        .retries(AVAILABILITY_RETRIES)
        .shape(body_shape(stream));

    match client.get(&path, &request).await {
        Ok(retried) => match retried.value {
            Fetched::Page(_) => {
                debug!("Stream '{}' is available", stream.name);
                Ok(true)
            }
            Fetched::Ignored { status } => {
                info!(
                    "Stream '{}' unavailable: HTTP {} from '{}'",
                    stream.name, status, path
                );
                Ok(false)
            }
        },
        Err(e) if e.is_run_fatal() => Err(e),
        Err(e) => {
            info!("Stream '{}' unavailable: {}", stream.name, e);
            Ok(false)
        }
    }
}

/// Restrict a catalog to the streams the store actually serves
pub async fn discover(client: &HttpClient, catalog: &Catalog) -> Result<Catalog> {
    let mut available: BTreeSet<&'static str> = BTreeSet::new();

    for stream in catalog.top_level() {
        if is_available(client, stream).await? {
            available.insert(stream.name);
        }
    }

    // Parents precede their children in catalog order, but a child may
    // itself be a parent, so repeat until nothing changes.
    loop {
        let before = available.len();
        for stream in catalog.streams() {
            if let Some(parent) = stream.parent {
                if available.contains(parent) {
                    available.insert(stream.name);
                }
            }
        }
        if available.len() == before {
            break;
        }
    }

    let names: Vec<&str> = available.iter().copied().collect();
    let discovered = catalog.retain(&names);
    info!(
        "Discovered {} of {} streams",
        discovered.len(),
        catalog.len()
    );
    Ok(discovered)
}
