//! Tests for engine module

use super::*;
use crate::auth::AuthConfig;
use crate::http::{HttpClientConfig, RetryPolicy};
use crate::output::{MemorySink, SingerMessage};
use crate::pagination::PageCursor;
use crate::state::{parse_timestamp, CheckpointStore, StateManager};
use pretty_assertions::assert_eq;
use reqwest::header::HeaderMap;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API: &str = "/wp-json/wc/v3";

fn client(server: &MockServer, ignore_server_errors: bool) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(format!("{}{API}/", server.uri()))
        .retry(RetryPolicy::new(3, Duration::from_millis(1)))
        .ignore_server_errors(ignore_server_errors)
        .build();
    HttpClient::with_auth(config, AuthConfig::basic("ck_test", "cs_test")).unwrap()
}

fn engine(server: &MockServer) -> SyncEngine {
    SyncEngine::new(client(server, false), EngineConfig::default())
}

fn api(resource: &str) -> String {
    format!("{API}/{resource}")
}

fn page(body: serde_json::Value, total_pages: Option<u32>) -> ResponseTemplate {
    let template = ResponseTemplate::new(200).set_body_json(body);
    match total_pages {
        Some(total) => template.insert_header("X-WP-TotalPages", total.to_string().as_str()),
        None => template,
    }
}

async fn mount_probe(server: &MockServer, version: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path(api("system_status")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"environment": {"version": version}})),
        )
        .expect(expected)
        .mount(server)
        .await;
}

fn selected(names: &[&str]) -> Catalog {
    Catalog::woocommerce().select(names).unwrap()
}

fn bookmarked(stream: &str, value: &str) -> StateManager {
    StateManager::from_json(
        &json!({"bookmarks": {stream: {"replication_key": "date_modified", "replication_key_value": value}}})
            .to_string(),
    )
    .unwrap()
}

// ============================================================================
// Config and Stats Tests
// ============================================================================

#[test]
fn test_engine_config_default() {
    let config = EngineConfig::default();
    assert_eq!(config.lookback_days, 60);
    assert!(!config.use_old_version);
    assert_eq!(config.version_threshold, (5, 8));
    assert_eq!(
        config.start_date,
        parse_timestamp("2000-01-01T00:00:00").unwrap()
    );
}

#[test]
fn test_engine_config_builder() {
    let config = EngineConfig::new()
        .with_lookback_days(7)
        .with_old_version(true)
        .with_version_threshold(6, 1);
    assert_eq!(config.lookback_days, 7);
    assert!(config.use_old_version);
    assert_eq!(config.version_threshold, (6, 1));
}

#[test]
fn test_sync_stats_failures() {
    let mut stats = SyncStats::new();
    assert!(!stats.has_failures());
    stats.add_failure("coupons");
    stats.add_stream();
    assert!(stats.has_failures());
    assert_eq!(stats.failed_streams, vec!["coupons".to_string()]);
    assert_eq!(stats.streams_synced, 1);
}

// ============================================================================
// Version Probe Tests
// ============================================================================

#[tokio::test]
async fn test_probe_detects_legacy_store() {
    let server = MockServer::start().await;
    mount_probe(&server, "5.7.1", 1).await;

    let dialect = probe_dialect(&client(&server, false), &EngineConfig::default()).await;
    assert_eq!(dialect, Dialect::Legacy);
}

#[tokio::test]
async fn test_probe_failure_is_single_attempt_and_modern() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("system_status")))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let dialect = probe_dialect(&client(&server, false), &EngineConfig::default()).await;
    assert_eq!(dialect, Dialect::Modern);
}

#[tokio::test]
async fn test_probe_skipped_for_old_version() {
    let server = MockServer::start().await;
    mount_probe(&server, "9.0", 0).await;

    let config = EngineConfig::new().with_old_version(true);
    let dialect = probe_dialect(&client(&server, false), &config).await;
    assert_eq!(dialect, Dialect::Legacy);
}

#[tokio::test]
async fn test_probe_unreachable_is_modern() {
    let config = HttpClientConfig::builder()
        .base_url("http://127.0.0.1:1/wp-json/wc/v3/")
        .timeout(Duration::from_secs(2))
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let dialect = probe_dialect(&client, &EngineConfig::default()).await;
    assert_eq!(dialect, Dialect::Modern);
}

// ============================================================================
// Pagination Driver Tests
// ============================================================================

#[tokio::test]
async fn test_single_total_page_makes_one_request() {
    let server = MockServer::start().await;
    mount_probe(&server, "8.0.0", 1).await;
    Mock::given(method("GET"))
        .and(path(api("coupons")))
        .and(query_param("per_page", "100"))
        .and(query_param("order", "asc"))
        .and(query_param_is_missing("page"))
        .respond_with(page(
            json!([{"id": 1, "code": "A", "date_modified": "2024-01-02T00:00:00"}]),
            Some(1),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let store = StateManager::in_memory();
    let mut sink = MemorySink::new();
    let stats = engine(&server)
        .sync(&selected(&["coupons"]), &store, &mut sink)
        .await
        .unwrap();

    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(stats.records_synced, 1);
    assert_eq!(
        store.get_watermark("coupons").await.as_deref(),
        Some("2024-01-02T00:00:00")
    );
}

#[tokio::test]
async fn test_three_total_pages_walks_cursor() {
    let server = MockServer::start().await;
    mount_probe(&server, "8.0.0", 1).await;

    Mock::given(method("GET"))
        .and(path(api("coupons")))
        .and(query_param_is_missing("page"))
        .respond_with(page(
            json!([{"id": 1, "date_modified": "2024-01-01T10:00:00"}]),
            Some(3),
        ))
        .expect(1)
        .mount(&server)
        .await;
    for n in 2..=3 {
        Mock::given(method("GET"))
            .and(path(api("coupons")))
            .and(query_param("page", n.to_string().as_str()))
            .respond_with(page(
                json!([{"id": n, "date_modified": format!("2024-01-0{n}T10:00:00")}]),
                Some(3),
            ))
            .expect(1)
            .mount(&server)
            .await;
    }

    let store = StateManager::in_memory();
    let mut sink = MemorySink::new();
    let stats = engine(&server)
        .sync(&selected(&["coupons"]), &store, &mut sink)
        .await
        .unwrap();

    assert_eq!(stats.pages_fetched, 3);
    let ids: Vec<_> = sink.records("coupons").iter().map(|r| r["id"].clone()).collect();
    assert_eq!(ids, vec![json!(1), json!(2), json!(3)]);
    assert_eq!(
        store.get_watermark("coupons").await.as_deref(),
        Some("2024-01-03T10:00:00")
    );
}

#[tokio::test]
async fn test_missing_total_pages_header_stops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("settings/general")))
        .respond_with(page(json!([{"id": "woocommerce_currency", "value": "EUR"}]), None))
        .expect(1)
        .mount(&server)
        .await;

    let store = StateManager::in_memory();
    let mut sink = MemorySink::new();
    engine(&server)
        .sync(&selected(&["store_settings"]), &store, &mut sink)
        .await
        .unwrap();

    assert_eq!(sink.records("store_settings").len(), 1);
    assert!(store.snapshot().await.bookmarks.is_empty());
    assert!(sink.states().is_empty());
}

#[tokio::test]
async fn test_dialect_is_probed_once_per_run() {
    let server = MockServer::start().await;
    mount_probe(&server, "8.0.0", 1).await;
    for resource in ["coupons", "customers"] {
        Mock::given(method("GET"))
            .and(path(api(resource)))
            .respond_with(page(json!([]), Some(1)))
            .mount(&server)
            .await;
    }

    let mut engine = engine(&server);
    assert_eq!(engine.resolved_dialect(), None);
    engine
        .sync(
            &selected(&["coupons", "customers"]),
            &StateManager::in_memory(),
            &mut MemorySink::new(),
        )
        .await
        .unwrap();
    assert_eq!(engine.resolved_dialect(), Some(Dialect::Modern));
}

#[tokio::test]
async fn test_full_refresh_stream_never_probes() {
    let server = MockServer::start().await;
    mount_probe(&server, "8.0.0", 0).await;
    Mock::given(method("GET"))
        .and(path(api("settings/general")))
        .respond_with(page(json!([]), Some(1)))
        .mount(&server)
        .await;

    let mut engine = engine(&server);
    engine
        .sync(
            &selected(&["store_settings"]),
            &StateManager::in_memory(),
            &mut MemorySink::new(),
        )
        .await
        .unwrap();
    assert_eq!(engine.resolved_dialect(), None);
}

// ============================================================================
// Replication Tests
// ============================================================================

#[tokio::test]
async fn test_modern_filter_uses_stored_watermark() {
    let server = MockServer::start().await;
    mount_probe(&server, "8.0.0", 1).await;
    Mock::given(method("GET"))
        .and(path(api("coupons")))
        .and(query_param("modified_after", "2024-01-01T00:00:00"))
        .respond_with(page(
            json!([{"id": 1, "date_modified": "2024-02-01T00:00:00"}]),
            Some(1),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let store = bookmarked("coupons", "2024-01-01T00:00:00");
    let mut sink = MemorySink::new();
    engine(&server)
        .sync(&selected(&["coupons"]), &store, &mut sink)
        .await
        .unwrap();

    assert_eq!(sink.records("coupons").len(), 1);
}

#[tokio::test]
async fn test_legacy_store_filters_client_side() {
    let server = MockServer::start().await;
    mount_probe(&server, "8.0.0", 0).await;
    Mock::given(method("GET"))
        .and(path(api("coupons")))
        .and(query_param("after", "2023-11-02T00:00:00"))
        .respond_with(page(
            json!([
                {"id": 1, "date_modified": "2023-12-15T00:00:00"},
                {"id": 2, "date_modified": "2024-01-01T00:00:00"},
                {"id": 3, "date_modified": "2024-02-01T00:00:00"},
                {"id": 4, "date_modified": "not a date"}
            ]),
            Some(1),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let store = bookmarked("coupons", "2024-01-01T00:00:00");
    let mut sink = MemorySink::new();
    let config = EngineConfig::new()
        .with_old_version(true)
        .with_lookback_days(60);
    SyncEngine::new(client(&server, false), config)
        .sync(&selected(&["coupons"]), &store, &mut sink)
        .await
        .unwrap();

    let ids: Vec<_> = sink.records("coupons").iter().map(|r| r["id"].clone()).collect();
    assert_eq!(ids, vec![json!(3), json!(4)]);
    assert_eq!(
        store.get_watermark("coupons").await.as_deref(),
        Some("2024-02-01T00:00:00")
    );
}

#[tokio::test]
async fn test_legacy_store_keeps_records_without_timestamps() {
    let server = MockServer::start().await;
    mount_probe(&server, "4.0.0", 1).await;
    Mock::given(method("GET"))
        .and(path(api("coupons")))
        .and(query_param("after", "2023-11-02T00:00:00"))
        .respond_with(page(
            json!([
                {"id": 1, "date_modified": "2023-12-15T00:00:00"},
                {"id": 2, "code": "spring"}
            ]),
            Some(1),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let store = bookmarked("coupons", "2024-01-01T00:00:00");
    let mut sink = MemorySink::new();
    let mut engine = engine(&server);
    engine
        .sync(&selected(&["coupons"]), &store, &mut sink)
        .await
        .unwrap();

    assert_eq!(engine.resolved_dialect(), Some(Dialect::Legacy));
    let records = sink.records("coupons");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], json!(2));
    assert_eq!(records[0]["date_modified"], json!(crate::state::SENTINEL));
    assert_eq!(
        store.get_watermark("coupons").await.as_deref(),
        Some("2024-01-01T00:00:00")
    );
}

#[tokio::test]
async fn test_watermark_never_regresses() {
    let server = MockServer::start().await;
    mount_probe(&server, "8.0.0", 1).await;
    Mock::given(method("GET"))
        .and(path(api("coupons")))
        .respond_with(page(
            json!([{"id": 1, "date_modified": "2023-06-01T00:00:00"}]),
            Some(1),
        ))
        .mount(&server)
        .await;

    let store = bookmarked("coupons", "2024-05-01T00:00:00");
    engine(&server)
        .sync(&selected(&["coupons"]), &store, &mut MemorySink::new())
        .await
        .unwrap();

    assert_eq!(
        store.get_watermark("coupons").await.as_deref(),
        Some("2024-05-01T00:00:00")
    );
}

#[tokio::test]
async fn test_records_are_normalized() {
    let server = MockServer::start().await;
    mount_probe(&server, "8.0.0", 1).await;
    Mock::given(method("GET"))
        .and(path(api("coupons")))
        .respond_with(page(
            json!([{
                "id": 1,
                "code": "",
                "date_created": "2024-01-05T08:00:00",
                "meta_data": [{"key": "k", "value": ""}]
            }]),
            Some(1),
        ))
        .mount(&server)
        .await;

    let mut sink = MemorySink::new();
    engine(&server)
        .sync(&selected(&["coupons"]), &StateManager::in_memory(), &mut sink)
        .await
        .unwrap();

    let records = sink.records("coupons");
    assert_eq!(
        serde_json::Value::Object(records[0].clone()),
        json!({
            "id": 1,
            "code": null,
            "date_created": "2024-01-05T08:00:00",
            "date_modified": "2024-01-05T08:00:00",
            "meta_data": [{"key": "k", "value": null}]
        })
    );
}

#[tokio::test]
async fn test_schema_precedes_records_and_state_follows() {
    let server = MockServer::start().await;
    mount_probe(&server, "8.0.0", 1).await;
    Mock::given(method("GET"))
        .and(path(api("coupons")))
        .respond_with(page(
            json!([
                {"id": 1, "date_modified": "2024-01-01T00:00:00"},
                {"id": 2, "date_modified": "2024-01-02T00:00:00"}
            ]),
            Some(1),
        ))
        .mount(&server)
        .await;

    let mut sink = MemorySink::new();
    engine(&server)
        .sync(&selected(&["coupons"]), &StateManager::in_memory(), &mut sink)
        .await
        .unwrap();

    let kinds: Vec<&str> = sink
        .messages()
        .iter()
        .map(|m| match m {
            SingerMessage::Schema { .. } => "schema",
            SingerMessage::Record { .. } => "record",
            SingerMessage::State { .. } => "state",
        })
        .collect();
    assert_eq!(kinds, vec!["schema", "record", "record", "state"]);
}

// ============================================================================
// Failure Handling Tests
// ============================================================================

#[tokio::test]
async fn test_ignored_server_errors_stop_after_twenty_pages() {
    let server = MockServer::start().await;
    mount_probe(&server, "8.0.0", 1).await;
    Mock::given(method("GET"))
        .and(path(api("coupons")))
        .respond_with(ResponseTemplate::new(500))
        .expect(20)
        .mount(&server)
        .await;

    let mut sink = MemorySink::new();
    let stats = SyncEngine::new(client(&server, true), EngineConfig::default())
        .sync(&selected(&["coupons"]), &StateManager::in_memory(), &mut sink)
        .await
        .unwrap();

    assert_eq!(stats.degraded_pages, 20);
    assert_eq!(stats.pages_fetched, 0);
    assert_eq!(sink.record_count(), 0);
}

#[tokio::test]
async fn test_degraded_page_is_skipped() {
    let server = MockServer::start().await;
    mount_probe(&server, "8.0.0", 1).await;
    Mock::given(method("GET"))
        .and(path(api("coupons")))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("coupons")))
        .and(query_param("page", "2"))
        .respond_with(page(
            json!([{"id": 2, "date_modified": "2024-01-02T00:00:00"}]),
            Some(2),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let mut sink = MemorySink::new();
    let stats = SyncEngine::new(client(&server, true), EngineConfig::default())
        .sync(&selected(&["coupons"]), &StateManager::in_memory(), &mut sink)
        .await
        .unwrap();

    assert_eq!(stats.degraded_pages, 1);
    assert_eq!(sink.records("coupons").len(), 1);
}

#[tokio::test]
async fn test_unauthorized_aborts_run() {
    let server = MockServer::start().await;
    mount_probe(&server, "8.0.0", 1).await;
    Mock::given(method("GET"))
        .and(path(api("coupons")))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("customers")))
        .respond_with(page(json!([]), Some(1)))
        .expect(0)
        .mount(&server)
        .await;

    let result = engine(&server)
        .sync(
            &selected(&["coupons", "customers"]),
            &StateManager::in_memory(),
            &mut MemorySink::new(),
        )
        .await;

    assert!(matches!(result, Err(Error::Auth { status: 401, .. })));
}

#[tokio::test]
async fn test_stream_failure_does_not_stop_other_streams() {
    let server = MockServer::start().await;
    mount_probe(&server, "8.0.0", 1).await;
    Mock::given(method("GET"))
        .and(path(api("coupons")))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad filter"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("customers")))
        .respond_with(page(
            json!([{"id": 5, "date_modified": "2024-01-01T00:00:00"}]),
            Some(1),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let store = StateManager::in_memory();
    let mut sink = MemorySink::new();
    let mut engine = engine(&server);
    let result = engine
        .sync(&selected(&["coupons", "customers"]), &store, &mut sink)
        .await;

    match result {
        Err(Error::StreamsFailed { count, streams }) => {
            assert_eq!(count, 1);
            assert_eq!(streams, "coupons");
        }
        other => panic!("Expected failed streams, got {other:?}"),
    }
    assert_eq!(sink.records("customers").len(), 1);
    assert_eq!(store.get_watermark("coupons").await, None);
    assert!(store.get_watermark("customers").await.is_some());
    assert_eq!(engine.stats().streams_synced, 1);
}

/// Always claims page 2 comes next
struct StuckPaginator;

impl Paginator for StuckPaginator {
    fn request_params(&self, cursor: PageCursor) -> HashMap<String, String> {
        TotalPagesPaginator::new().request_params(cursor)
    }

    fn next_page(&self, _headers: &HeaderMap, _cursor: PageCursor) -> NextPage {
        NextPage::Continue(PageCursor::page(2))
    }
}

#[tokio::test]
async fn test_repeated_cursor_aborts_stream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("settings/general")))
        .respond_with(page(json!([{"id": "a"}]), Some(5)))
        .expect(2)
        .mount(&server)
        .await;

    let store = StateManager::in_memory();
    let result = engine(&server)
        .with_paginator(StuckPaginator)
        .sync(
            &selected(&["store_settings"]),
            &store,
            &mut MemorySink::new(),
        )
        .await;

    assert!(matches!(result, Err(Error::StreamsFailed { count: 1, .. })));
}

// ============================================================================
// Parent/Child Tests
// ============================================================================

async fn mount_orders(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(api("orders")))
        .respond_with(page(
            json!([
                {"id": 11, "date_modified": "2024-03-01T00:00:00"},
                {"id": 12, "date_modified": "2024-03-02T00:00:00"}
            ]),
            Some(1),
        ))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_child_stream_receives_parent_contexts() {
    let server = MockServer::start().await;
    mount_probe(&server, "8.0.0", 1).await;
    mount_orders(&server).await;
    for order in [11, 12] {
        Mock::given(method("GET"))
            .and(path(api(&format!("orders/{order}/notes"))))
            .respond_with(page(
                json!([{"id": order * 10, "note": "Paid", "author": ""}]),
                None,
            ))
            .expect(1)
            .mount(&server)
            .await;
    }

    let store = StateManager::in_memory();
    let mut sink = MemorySink::new();
    engine(&server)
        .sync(&selected(&["order_notes"]), &store, &mut sink)
        .await
        .unwrap();

    assert!(sink.records("orders").is_empty());
    let notes = sink.records("order_notes");
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0]["order_id"], 11);
    assert_eq!(notes[1]["order_id"], 12);
    assert_eq!(notes[0]["author"], serde_json::Value::Null);
    assert_eq!(sink.schemas(), vec!["order_notes"]);
    assert_eq!(store.get_watermark("orders").await, None);
}

#[tokio::test]
async fn test_failed_child_context_fails_child_only() {
    let server = MockServer::start().await;
    mount_probe(&server, "8.0.0", 1).await;
    mount_orders(&server).await;
    Mock::given(method("GET"))
        .and(path(api("orders/11/notes")))
        .respond_with(page(json!([{"id": 110}]), None))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("orders/12/notes")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = StateManager::in_memory();
    let mut sink = MemorySink::new();
    let result = engine(&server)
        .sync(&selected(&["orders", "order_notes"]), &store, &mut sink)
        .await;

    match result {
        Err(Error::StreamsFailed { streams, .. }) => assert_eq!(streams, "order_notes"),
        other => panic!("Expected failed streams, got {other:?}"),
    }
    assert_eq!(sink.records("orders").len(), 2);
    assert_eq!(
        store.get_watermark("orders").await.as_deref(),
        Some("2024-03-02T00:00:00")
    );
}

#[tokio::test]
async fn test_only_variable_products_feed_variations() {
    let server = MockServer::start().await;
    mount_probe(&server, "8.0.0", 1).await;
    Mock::given(method("GET"))
        .and(path(api("products")))
        .respond_with(page(
            json!([
                {"id": 1, "type": "simple", "date_modified": "2024-01-01T00:00:00"},
                {"id": 2, "type": "variable", "date_modified": "2024-01-01T00:00:00"}
            ]),
            Some(1),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("products/2/variations")))
        .respond_with(page(json!([{"id": 21}, {"id": 22}]), Some(1)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("products/1/variations")))
        .respond_with(page(json!([]), Some(1)))
        .expect(0)
        .mount(&server)
        .await;

    let mut sink = MemorySink::new();
    engine(&server)
        .sync(
            &selected(&["products", "product_variance"]),
            &StateManager::in_memory(),
            &mut sink,
        )
        .await
        .unwrap();

    assert_eq!(sink.records("products").len(), 2);
    let variations = sink.records("product_variance");
    assert_eq!(variations.len(), 2);
    assert_eq!(variations[0]["product_id"], 2);
}

// ============================================================================
// Discovery Tests
// ============================================================================

#[tokio::test]
async fn test_discovery_keeps_answering_streams() {
    let server = MockServer::start().await;
    for resource in ["products", "orders", "customers"] {
        Mock::given(method("GET"))
            .and(path(api(resource)))
            .and(query_param("per_page", "1"))
            .respond_with(page(json!([]), Some(1)))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(api("settings/general")))
        .respond_with(ResponseTemplate::new(500))
        .expect(u64::from(AVAILABILITY_RETRIES) + 1)
        .mount(&server)
        .await;

    let discovered = discover(&client(&server, false), &Catalog::woocommerce())
        .await
        .unwrap();

    let names: Vec<&str> = discovered.streams().iter().map(|s| s.name).collect();
    assert_eq!(
        names,
        vec!["products", "orders", "product_variance", "customers", "order_notes"]
    );
}

#[tokio::test]
async fn test_availability_check_uses_small_retry_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("coupons")))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(format!("{}{API}/", server.uri()))
        .retry(RetryPolicy::new(10, Duration::from_millis(1)))
        .build();
    let client = HttpClient::with_auth(config, AuthConfig::basic("ck_test", "cs_test")).unwrap();
    let coupons = *Catalog::woocommerce().get("coupons").unwrap();

    assert!(!is_available(&client, &coupons).await.unwrap());
}

#[tokio::test]
async fn test_discovery_aborts_on_bad_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let result = discover(&client(&server, false), &Catalog::woocommerce()).await;
    assert!(matches!(result, Err(Error::Auth { .. })));
}

#[tokio::test]
async fn test_discovery_drops_children_of_missing_parents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("orders")))
        .respond_with(page(json!([]), Some(1)))
        .mount(&server)
        .await;

    let discovered = discover(&client(&server, false), &Catalog::woocommerce())
        .await
        .unwrap();

    assert!(discovered.get("order_notes").is_some());
    assert!(discovered.get("product_variance").is_none());
    assert!(discovered.get("products").is_none());
}
