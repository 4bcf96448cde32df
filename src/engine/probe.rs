//! Server version probe
//!
//! Stores from 5.8 on accept `modified_after`; older ones only understand
//! `after`. The probe asks `system_status` once and falls back to the modern
//! dialect whenever the answer is unavailable.

use super::types::EngineConfig;
use crate::http::{BodyShape, HttpClient, RequestConfig};
use crate::types::{Dialect, JsonValue};
use tracing::{debug, info};

/// Endpoint reporting the WooCommerce version
pub const SYSTEM_STATUS_PATH: &str = "system_status";

/// Parse a dotted version into (major, minor)
///
/// Patch levels and pre-release suffixes are ignored; a bare major version
/// reads as `major.0`.
pub fn parse_version(value: &str) -> Option<(u32, u32)> {
    let mut parts = value.trim().split('.');
    let major = parts.next()?.trim().parse().ok()?;
    let minor = match parts.next() {
        Some(minor) => {
            let digits: String = minor.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()?
        }
        None => 0,
    };
    Some((major, minor))
}

/// Decide the dialect from a `system_status` body
pub fn dialect_from_status(body: &JsonValue, threshold: (u32, u32)) -> Dialect {
    let version = body
        .get("environment")
        .and_then(|env| env.get("version"))
        .and_then(JsonValue::as_str);

    let Some(version) = version else {
        debug!("system_status has no environment.version, assuming modern store");
        return Dialect::Modern;
    };

    match parse_version(version) {
        Some(parsed) if parsed < threshold => Dialect::Legacy,
        Some(_) => Dialect::Modern,
        None => {
            debug!("Unparsable WooCommerce version '{}', assuming modern store", version);
            Dialect::Modern
        }
    }
}

/// Resolve the store dialect with at most one request
pub async fn probe_dialect(client: &HttpClient, config: &EngineConfig) -> Dialect {
    if config.use_old_version {
        info!("use_old_version is set, using legacy dialect");
        return Dialect::Legacy;
    }

    let request = RequestConfig::new().retries(0).shape(BodyShape::Any);
    let dialect = match client.get(SYSTEM_STATUS_PATH, &request).await {
        Ok(retried) => match retried.value.into_page() {
            Some(page) => dialect_from_status(&page.body, config.version_threshold),
            None => Dialect::Modern,
        },
        Err(e) => {
            info!("Version probe failed ({}), assuming modern store", e);
            Dialect::Modern
        }
    };

    info!("Detected {} WooCommerce dialect", dialect);
    dialect
}
