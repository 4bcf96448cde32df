//! Static stream schemas
//!
//! Top-level fields of each WooCommerce resource. Every field is nullable
//! because the API omits or blanks values freely; nested objects are left
//! open rather than enumerated.

use crate::schema::{JsonSchema, JsonType, JsonTypeOrArray, SchemaProperty};
use FieldType as F;

/// Declared type of a top-level field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Number,
    String,
    DateTime,
    Boolean,
    Object,
    IntegerArray,
    StringArray,
    ObjectArray,
    StringOrNumber,
    ArrayOrString,
    ObjectOrArray,
    ObjectOrString,
    /// Whatever the store sends
    Any,
}

impl FieldType {
    /// JSON schema for the field
    pub fn property(self) -> SchemaProperty {
        match self {
            F::Integer => SchemaProperty::nullable(JsonType::Integer),
            F::Number => SchemaProperty::nullable(JsonType::Number),
            F::String => SchemaProperty::nullable(JsonType::String),
            F::DateTime => SchemaProperty::nullable(JsonType::String).with_format("date-time"),
            F::Boolean => SchemaProperty::nullable(JsonType::Boolean),
            F::Object => SchemaProperty::nullable(JsonType::Object),
            F::IntegerArray => SchemaProperty::array(SchemaProperty::nullable(JsonType::Integer)),
            F::StringArray => SchemaProperty::array(SchemaProperty::nullable(JsonType::String)),
            F::ObjectArray => SchemaProperty::array(SchemaProperty::nullable(JsonType::Object)),
            F::StringOrNumber => union(&[JsonType::String, JsonType::Number]),
            F::ArrayOrString => union(&[JsonType::Array, JsonType::String]),
            F::ObjectOrArray => union(&[JsonType::Object, JsonType::Array]),
            F::ObjectOrString => union(&[JsonType::Object, JsonType::String]),
            F::Any => union(&[JsonType::Array, JsonType::Object, JsonType::String]),
        }
    }
}

fn union(types: &[JsonType]) -> SchemaProperty {
    SchemaProperty::new(JsonTypeOrArray::nullable_union(types))
}

/// Build an object schema from a field list
pub fn build_schema(fields: &[(&str, FieldType)]) -> JsonSchema {
    let mut schema = JsonSchema::new();
    for (name, field) in fields {
        schema.add_property(name, field.property());
    }
    schema
}

pub const PRODUCTS: &[(&str, FieldType)] = &[
    ("id", F::Integer),
    ("name", F::String),
    ("slug", F::String),
    ("permalink", F::String),
    ("date_created", F::DateTime),
    ("date_modified", F::DateTime),
    ("date_created_gmt", F::DateTime),
    ("date_modified_gmt", F::DateTime),
    ("date_on_sale_from_gmt", F::DateTime),
    ("date_on_sale_to_gmt", F::DateTime),
    ("low_stock_amount", F::StringOrNumber),
    ("type", F::String),
    ("status", F::String),
    ("featured", F::Boolean),
    ("catalog_visibility", F::String),
    ("description", F::String),
    ("short_description", F::String),
    ("sku", F::String),
    ("brands", F::ArrayOrString),
    ("price", F::StringOrNumber),
    ("regular_price", F::StringOrNumber),
    ("sale_price", F::StringOrNumber),
    ("date_on_sale_from", F::DateTime),
    ("date_on_sale_to", F::DateTime),
    ("price_html", F::String),
    ("on_sale", F::Boolean),
    ("purchasable", F::Boolean),
    ("total_sales", F::StringOrNumber),
    ("virtual", F::Boolean),
    ("downloadable", F::Boolean),
    ("downloads", F::ObjectOrArray),
    ("download_limit", F::Integer),
    ("download_expiry", F::Integer),
    ("external_url", F::String),
    ("button_text", F::String),
    ("tax_status", F::String),
    ("tax_class", F::String),
    ("manage_stock", F::Boolean),
    ("stock_quantity", F::Number),
    ("stock_status", F::String),
    ("backorders", F::String),
    ("backorders_allowed", F::Boolean),
    ("backordered", F::Boolean),
    ("sold_individually", F::Boolean),
    ("weight", F::String),
    ("dimensions", F::Object),
    ("shipping_required", F::Boolean),
    ("shipping_taxable", F::Boolean),
    ("shipping_class", F::String),
    ("shipping_class_id", F::Integer),
    ("reviews_allowed", F::Boolean),
    ("average_rating", F::String),
    ("rating_count", F::Integer),
    ("related_ids", F::IntegerArray),
    ("upsell_ids", F::IntegerArray),
    ("cross_sell_ids", F::ObjectOrArray),
    ("parent_id", F::Integer),
    ("purchase_note", F::String),
    ("categories", F::ObjectArray),
    ("tags", F::ObjectArray),
    ("images", F::ObjectArray),
    ("attributes", F::ObjectArray),
    ("default_attributes", F::ObjectArray),
    ("variations", F::IntegerArray),
    ("grouped_products", F::IntegerArray),
    ("menu_order", F::Integer),
    ("meta_data", F::ObjectArray),
];

pub const ORDERS: &[(&str, FieldType)] = &[
    ("id", F::Integer),
    ("parent_id", F::Integer),
    ("number", F::String),
    ("order_key", F::String),
    ("created_via", F::String),
    ("version", F::String),
    ("status", F::String),
    ("currency", F::String),
    ("currency_symbol", F::String),
    ("date_created", F::DateTime),
    ("date_created_gmt", F::DateTime),
    ("date_modified", F::DateTime),
    ("date_modified_gmt", F::DateTime),
    ("discount_total", F::String),
    ("discount_tax", F::String),
    ("shipping_total", F::String),
    ("shipping_tax", F::String),
    ("cart_tax", F::String),
    ("total", F::String),
    ("total_tax", F::String),
    ("prices_include_tax", F::Boolean),
    ("customer_id", F::Integer),
    ("customer_ip_address", F::String),
    ("customer_user_agent", F::String),
    ("customer_note", F::String),
    ("billing", F::Object),
    ("shipping", F::Object),
    ("payment_method", F::String),
    ("payment_method_title", F::String),
    ("transaction_id", F::String),
    ("date_paid", F::DateTime),
    ("date_paid_gmt", F::DateTime),
    ("date_completed", F::DateTime),
    ("date_completed_gmt", F::DateTime),
    ("cart_hash", F::String),
    ("line_items", F::ObjectArray),
    ("tax_lines", F::ObjectArray),
    ("shipping_lines", F::ObjectArray),
    ("fee_lines", F::ObjectArray),
    ("coupon_lines", F::ObjectArray),
    ("refunds", F::ObjectArray),
];

pub const COUPONS: &[(&str, FieldType)] = &[
    ("id", F::Integer),
    ("code", F::String),
    ("amount", F::String),
    ("date_created", F::DateTime),
    ("date_created_gmt", F::DateTime),
    ("date_modified", F::DateTime),
    ("date_modified_gmt", F::DateTime),
    ("discount_type", F::String),
    ("description", F::String),
    ("date_expires", F::String),
    ("date_expires_gmt", F::String),
    ("usage_count", F::Integer),
    ("individual_use", F::Boolean),
    ("product_ids", F::IntegerArray),
    ("excluded_product_ids", F::IntegerArray),
    ("usage_limit", F::Integer),
    ("usage_limit_per_user", F::Integer),
    ("limit_usage_to_x_items", F::Integer),
    ("free_shipping", F::Boolean),
    ("product_categories", F::IntegerArray),
    ("excluded_product_categories", F::IntegerArray),
    ("exclude_sale_items", F::Boolean),
    ("minimum_amount", F::String),
    ("maximum_amount", F::String),
    ("email_restrictions", F::StringArray),
    ("used_by", F::Any),
];

pub const PRODUCT_VARIANCE: &[(&str, FieldType)] = &[
    ("id", F::Integer),
    ("date_created", F::DateTime),
    ("date_created_gmt", F::DateTime),
    ("date_modified", F::DateTime),
    ("date_modified_gmt", F::DateTime),
    ("description", F::String),
    ("permalink", F::String),
    ("sku", F::String),
    ("price", F::StringOrNumber),
    ("regular_price", F::StringOrNumber),
    ("sale_price", F::StringOrNumber),
    ("date_on_sale_from", F::DateTime),
    ("date_on_sale_from_gmt", F::DateTime),
    ("date_on_sale_to", F::DateTime),
    ("date_on_sale_to_gmt", F::DateTime),
    ("on_sale", F::Boolean),
    ("status", F::String),
    ("purchasable", F::Boolean),
    ("virtual", F::Boolean),
    ("downloadable", F::Boolean),
    ("downloads", F::ObjectOrArray),
    ("download_limit", F::Integer),
    ("download_expiry", F::Integer),
    ("tax_status", F::String),
    ("tax_class", F::String),
    ("manage_stock", F::Boolean),
    ("stock_quantity", F::Number),
    ("stock_status", F::String),
    ("backorders", F::String),
    ("backorders_allowed", F::Boolean),
    ("backordered", F::Boolean),
    ("weight", F::String),
    ("dimensions", F::Object),
    ("shipping_class", F::String),
    ("shipping_class_id", F::Integer),
    ("image", F::Object),
    ("attributes", F::ObjectArray),
    ("menu_order", F::Integer),
    ("meta_data", F::ObjectArray),
    ("_links", F::Object),
];

pub const SUBSCRIPTIONS: &[(&str, FieldType)] = &[
    ("id", F::Integer),
    ("parent_id", F::Integer),
    ("status", F::String),
    ("currency", F::String),
    ("version", F::String),
    ("prices_include_tax", F::Boolean),
    ("discount_total", F::String),
    ("discount_tax", F::String),
    ("shipping_total", F::String),
    ("shipping_tax", F::String),
    ("cart_tax", F::String),
    ("total", F::String),
    ("total_tax", F::String),
    ("customer_id", F::Number),
    ("order_key", F::String),
    ("billing", F::Object),
    ("shipping", F::Object),
    ("payment_method", F::String),
    ("payment_method_title", F::String),
    ("customer_ip_address", F::String),
    ("customer_user_agent", F::String),
    ("created_via", F::String),
    ("customer_note", F::String),
    ("date_completed", F::DateTime),
    ("date_paid", F::DateTime),
    ("number", F::String),
    ("meta_data", F::ObjectArray),
    ("line_items", F::ObjectArray),
    ("tax_lines", F::ObjectArray),
    ("shipping_lines", F::ObjectArray),
    ("fee_lines", F::ObjectArray),
    ("coupon_lines", F::ObjectArray),
    ("date_completed_gmt", F::DateTime),
    ("date_paid_gmt", F::DateTime),
    ("billing_period", F::String),
    ("billing_interval", F::String),
    ("start_date_gmt", F::DateTime),
    ("trial_end_date_gmt", F::DateTime),
    ("next_payment_date_gmt", F::DateTime),
    ("last_payment_date_gmt", F::DateTime),
    ("cancelled_date_gmt", F::DateTime),
    ("end_date_gmt", F::DateTime),
    ("resubscribed_from", F::String),
    ("resubscribed_subscription", F::String),
    ("removed_line_items", F::ObjectArray),
    ("_links", F::Object),
    ("date_created", F::DateTime),
    ("date_modified", F::DateTime),
    ("date_created_gmt", F::DateTime),
    ("date_modified_gmt", F::DateTime),
];

pub const CUSTOMERS: &[(&str, FieldType)] = &[
    ("id", F::Integer),
    ("date_created", F::DateTime),
    ("date_modified", F::DateTime),
    ("date_created_gmt", F::DateTime),
    ("date_modified_gmt", F::DateTime),
    ("email", F::String),
    ("first_name", F::String),
    ("last_name", F::String),
    ("role", F::String),
    ("username", F::String),
    ("billing", F::Object),
    ("shipping", F::Object),
    ("is_paying_customer", F::Boolean),
    ("avatar_url", F::String),
    ("meta_data", F::ObjectArray),
    ("_links", F::Object),
];

pub const STORE_SETTINGS: &[(&str, FieldType)] = &[
    ("id", F::String),
    ("label", F::String),
    ("description", F::String),
    ("type", F::String),
    ("default", F::String),
    ("tip", F::String),
    ("value", F::ArrayOrString),
    ("group_id", F::String),
];

pub const ORDER_NOTES: &[(&str, FieldType)] = &[
    ("id", F::Number),
    ("order_id", F::Number),
    ("author", F::String),
    ("date_created", F::DateTime),
    ("date_created_gmt", F::DateTime),
    ("note", F::String),
    ("customer_note", F::Boolean),
    ("_links", F::ObjectOrString),
];
