//! Tests for output module

use super::*;
use crate::catalog::{Catalog, StreamDefinition};
use crate::state::{Bookmark, State};
use crate::types::JsonObject;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn stream(name: &str) -> StreamDefinition {
    *Catalog::woocommerce().get(name).unwrap()
}

fn record(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        _ => panic!("not an object"),
    }
}

fn lines(writer: SingerWriter<Vec<u8>>) -> Vec<Value> {
    String::from_utf8(writer.into_inner())
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

// ============================================================================
// SingerWriter Tests
// ============================================================================

#[test]
fn test_schema_message_shape() {
    let mut writer = SingerWriter::new(Vec::new());
    writer.write_schema(&stream("orders")).unwrap();

    let out = lines(writer);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0]["type"], "SCHEMA");
    assert_eq!(out[0]["stream"], "orders");
    assert_eq!(out[0]["key_properties"], json!(["id"]));
    assert_eq!(out[0]["bookmark_properties"], json!(["date_modified"]));
    assert_eq!(out[0]["schema"]["type"], "object");
}

#[test]
fn test_full_table_schema_has_no_bookmark_properties() {
    let mut writer = SingerWriter::new(Vec::new());
    writer.write_schema(&stream("store_settings")).unwrap();

    let out = lines(writer);
    assert!(out[0].get("bookmark_properties").is_none());
}

#[test]
fn test_record_message_shape() {
    let mut writer = SingerWriter::new(Vec::new());
    writer
        .write_record("coupons", record(json!({"id": 7, "code": "SPRING"})))
        .unwrap();
    assert_eq!(writer.lines(), 1);

    let out = lines(writer);
    assert_eq!(out[0]["type"], "RECORD");
    assert_eq!(out[0]["stream"], "coupons");
    assert_eq!(out[0]["record"], json!({"id": 7, "code": "SPRING"}));
    assert!(out[0]["time_extracted"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn test_state_message_shape() {
    let mut state = State::new();
    state.set_bookmark(
        "orders",
        Bookmark::new("date_modified", "2024-03-01T10:00:00"),
    );

    let mut writer = SingerWriter::new(Vec::new());
    writer.write_state(&state).unwrap();

    let out = lines(writer);
    assert_eq!(
        out[0],
        json!({
            "type": "STATE",
            "value": {
                "bookmarks": {
                    "orders": {
                        "replication_key": "date_modified",
                        "replication_key_value": "2024-03-01T10:00:00"
                    }
                }
            }
        })
    );
}

#[test]
fn test_one_line_per_message() {
    let mut writer = SingerWriter::new(Vec::new());
    writer.write_schema(&stream("coupons")).unwrap();
    writer
        .write_record("coupons", record(json!({"id": 1, "note": "a\nb"})))
        .unwrap();
    writer.write_state(&State::new()).unwrap();

    assert_eq!(writer.lines(), 3);
    assert_eq!(lines(writer).len(), 3);
}

// ============================================================================
// MemorySink Tests
// ============================================================================

#[test]
fn test_memory_sink_accessors() {
    let mut sink = MemorySink::new();
    sink.write_schema(&stream("orders")).unwrap();
    sink.write_record("orders", record(json!({"id": 1}))).unwrap();
    sink.write_record("orders", record(json!({"id": 2}))).unwrap();
    sink.write_schema(&stream("order_notes")).unwrap();
    sink.write_record("order_notes", record(json!({"id": 9}))).unwrap();
    sink.write_state(&State::new()).unwrap();

    assert_eq!(sink.schemas(), vec!["orders", "order_notes"]);
    assert_eq!(sink.records("orders").len(), 2);
    assert_eq!(sink.records("order_notes")[0]["id"], 9);
    assert_eq!(sink.record_count(), 3);
    assert_eq!(sink.states().len(), 1);
    assert_eq!(sink.messages().len(), 6);
    assert_eq!(sink.messages()[0].stream(), Some("orders"));
    assert_eq!(sink.messages()[5].stream(), None);
}
