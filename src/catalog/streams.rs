//! WooCommerce stream definitions

use super::schemas;
use super::types::{Context, StreamDefinition};
use crate::decode::DEFAULT_RECORDS_PATH;
use crate::types::{JsonObject, JsonValue};

const ID: &[&str] = &["id"];
const DATE_MODIFIED: Option<&str> = Some("date_modified");

/// Products; variable products feed `product_variance`
pub const PRODUCTS: StreamDefinition = StreamDefinition {
    name: "products",
    path: "products",
    primary_keys: ID,
    replication_key: DATE_MODIFIED,
    parent: None,
    records_path: DEFAULT_RECORDS_PATH,
    child_context: Some(variable_product_context),
    post_process: None,
    fields: schemas::PRODUCTS,
};

/// Orders; every order feeds `order_notes`
pub const ORDERS: StreamDefinition = StreamDefinition {
    name: "orders",
    path: "orders",
    primary_keys: ID,
    replication_key: DATE_MODIFIED,
    parent: None,
    records_path: DEFAULT_RECORDS_PATH,
    child_context: Some(order_context),
    post_process: None,
    fields: schemas::ORDERS,
};

pub const COUPONS: StreamDefinition = StreamDefinition {
    name: "coupons",
    path: "coupons",
    primary_keys: ID,
    replication_key: DATE_MODIFIED,
    parent: None,
    records_path: DEFAULT_RECORDS_PATH,
    child_context: None,
    post_process: None,
    fields: schemas::COUPONS,
};

/// Variations of one variable product
pub const PRODUCT_VARIANCE: StreamDefinition = StreamDefinition {
    name: "product_variance",
    path: "products/{product_id}/variations",
    primary_keys: ID,
    replication_key: None,
    parent: Some("products"),
    records_path: DEFAULT_RECORDS_PATH,
    child_context: None,
    post_process: None,
    fields: schemas::PRODUCT_VARIANCE,
};

/// Subscriptions (WooCommerce Subscriptions extension, often absent)
pub const SUBSCRIPTIONS: StreamDefinition = StreamDefinition {
    name: "subscriptions",
    path: "subscriptions",
    primary_keys: ID,
    replication_key: DATE_MODIFIED,
    parent: None,
    records_path: DEFAULT_RECORDS_PATH,
    child_context: None,
    post_process: None,
    fields: schemas::SUBSCRIPTIONS,
};

pub const CUSTOMERS: StreamDefinition = StreamDefinition {
    name: "customers",
    path: "customers",
    primary_keys: ID,
    replication_key: DATE_MODIFIED,
    parent: None,
    records_path: DEFAULT_RECORDS_PATH,
    child_context: None,
    post_process: None,
    fields: schemas::CUSTOMERS,
};

/// General store settings
pub const STORE_SETTINGS: StreamDefinition = StreamDefinition {
    name: "store_settings",
    path: "settings/general",
    primary_keys: ID,
    replication_key: None,
    parent: None,
    records_path: DEFAULT_RECORDS_PATH,
    child_context: None,
    post_process: None,
    fields: schemas::STORE_SETTINGS,
};

/// Notes of one order
pub const ORDER_NOTES: StreamDefinition = StreamDefinition {
    name: "order_notes",
    path: "orders/{order_id}/notes",
    primary_keys: ID,
    replication_key: None,
    parent: Some("orders"),
    records_path: DEFAULT_RECORDS_PATH,
    child_context: None,
    post_process: Some(inject_order_id),
    fields: schemas::ORDER_NOTES,
};

/// Every stream, in sync order
pub const ALL: &[StreamDefinition] = &[
    PRODUCTS,
    ORDERS,
    COUPONS,
    PRODUCT_VARIANCE,
    SUBSCRIPTIONS,
    CUSTOMERS,
    STORE_SETTINGS,
    ORDER_NOTES,
];

fn single(key: &str, value: JsonValue) -> Context {
    let mut ctx = Context::new();
    ctx.insert(key.to_string(), value);
    ctx
}

/// Only variable products have variations
pub(crate) fn variable_product_context(record: &JsonObject) -> Option<Context> {
    if record.get("type").and_then(JsonValue::as_str) != Some("variable") {
        return None;
    }
    record.get("id").map(|id| single("product_id", id.clone()))
}

pub(crate) fn order_context(record: &JsonObject) -> Option<Context> {
    record.get("id").map(|id| single("order_id", id.clone()))
}

/// Notes do not carry their order, so add it from the context
pub(crate) fn inject_order_id(mut row: JsonObject, context: Option<&Context>) -> Option<JsonObject> {
    let order_id = context
        .and_then(|ctx| ctx.get("order_id"))
        .cloned()
        .unwrap_or(JsonValue::Null);
    row.insert("order_id".to_string(), order_id);
    Some(row)
}
