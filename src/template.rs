//! Path template interpolation
//!
//! Child stream paths carry `{placeholder}` segments, e.g.
//! `orders/{order_id}/notes`, filled from the parent's context.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use regex::Regex;
use std::sync::LazyLock;

/// Regex for matching placeholders: {name}
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").unwrap());

/// Render a template with values from a context object
///
/// Every placeholder must resolve; missing keys are reported together.
pub fn render(template: &str, ctx: &JsonObject) -> Result<String> {
    let mut missing = Vec::new();

    let rendered = PLACEHOLDER_REGEX.replace_all(template, |caps: &regex::Captures<'_>| {
        let name = &caps[1];
        match ctx.get(name) {
            Some(value) if !value.is_null() => value_to_string(value),
            _ => {
                missing.push(name.to_string());
                String::new()
            }
        }
    });

    if missing.is_empty() {
        Ok(rendered.into_owned())
    } else {
        Err(Error::UndefinedVariable {
            variable: missing.join(", "),
        })
    }
}

/// Convert a JSON value to a string for substitution
fn value_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(value: JsonValue) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_simple_substitution() {
        let result = render("orders/{order_id}/notes", &ctx(json!({"order_id": 42}))).unwrap();
        assert_eq!(result, "orders/42/notes");
    }

    #[test]
    fn test_string_substitution() {
        let result = render(
            "products/{product_id}/variations",
            &ctx(json!({"product_id": "17"})),
        )
        .unwrap();
        assert_eq!(result, "products/17/variations");
    }

    #[test]
    fn test_multiple_substitutions() {
        let result = render(
            "{a}/{b}/{a}",
            &ctx(json!({"a": "x", "b": true})),
        )
        .unwrap();
        assert_eq!(result, "x/true/x");
    }

    #[test]
    fn test_undefined_variable() {
        let err = render("orders/{order_id}/notes", &JsonObject::new()).unwrap_err();
        assert!(matches!(err, Error::UndefinedVariable { .. }));
        assert!(err.to_string().contains("order_id"));
    }

    #[test]
    fn test_null_is_undefined() {
        let err = render("orders/{order_id}", &ctx(json!({"order_id": null}))).unwrap_err();
        assert!(err.to_string().contains("order_id"));
    }

    #[test]
    fn test_no_placeholders() {
        let result = render("settings/general", &JsonObject::new()).unwrap();
        assert_eq!(result, "settings/general");
    }
}
