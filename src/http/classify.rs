//! Failure classification
//!
//! Turns a completed HTTP exchange (status + raw body) into a decision the
//! retry controller and pagination driver can act on.

use crate::error::Error;
use serde_json::Value;

/// Shape the response body is expected to have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyShape {
    /// Any valid JSON document
    #[default]
    Any,
    /// A JSON array at the top level (collection endpoints)
    Array,
}

/// Outcome of inspecting one response
#[derive(Debug)]
pub enum Classification {
    /// 2xx with a body of the expected shape
    Success(Value),
    /// Transient failure, worth another attempt
    Retryable(Error),
    /// Permanent failure, propagate immediately
    Fatal(Error),
    /// Error status tolerated under `ignore_server_errors`
    Ignorable {
        /// HTTP status of the ignored response
        status: u16,
    },
}

/// Classify a response
///
/// 401 stays fatal even when server errors are ignored.
pub fn classify(
    path: &str,
    status: u16,
    body: &str,
    shape: BodyShape,
    ignore_server_errors: bool,
) -> Classification {
    if status == 401 {
        return Classification::Fatal(Error::Auth {
            path: path.to_string(),
            status,
        });
    }

    if status >= 400 {
        if ignore_server_errors {
            return Classification::Ignorable { status };
        }
        if status == 429 || status >= 500 {
            return Classification::Retryable(Error::Server {
                path: path.to_string(),
                status,
                body: truncate_body(body),
            });
        }
        return Classification::Fatal(Error::Client {
            path: path.to_string(),
            status,
            body: truncate_body(body),
        });
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value) => match (shape, &value) {
            (BodyShape::Array, Value::Array(_)) | (BodyShape::Any, _) => {
                Classification::Success(value)
            }
            (BodyShape::Array, other) => Classification::Retryable(Error::MalformedResponse {
                path: path.to_string(),
                status,
                message: format!("expected a JSON array, got {}", json_kind(other)),
            }),
        },
        Err(e) => Classification::Retryable(Error::MalformedResponse {
            path: path.to_string(),
            status,
            message: e.to_string(),
        }),
    }
}

/// Keep error bodies short enough for a log line
fn truncate_body(body: &str) -> String {
    const MAX: usize = 512;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod classify_tests {
    use super::*;
    use test_case::test_case;

    #[test_case(200, "[]", false => "success"; "ok array")]
    #[test_case(200, "[{\"id\":1}]", true => "success"; "ok array while ignoring")]
    #[test_case(401, "{}", false => "fatal"; "unauthorized")]
    #[test_case(401, "{}", true => "fatal"; "unauthorized while ignoring")]
    #[test_case(429, "", false => "retryable"; "rate limited")]
    #[test_case(500, "", false => "retryable"; "internal error")]
    #[test_case(503, "", false => "retryable"; "unavailable")]
    #[test_case(400, "{}", false => "fatal"; "bad request")]
    #[test_case(403, "{}", false => "fatal"; "forbidden")]
    #[test_case(404, "{}", false => "fatal"; "not found")]
    #[test_case(404, "{}", true => "ignorable"; "not found while ignoring")]
    #[test_case(500, "", true => "ignorable"; "internal error while ignoring")]
    #[test_case(429, "", true => "ignorable"; "rate limited while ignoring")]
    #[test_case(200, "<html>", false => "retryable"; "unparseable body")]
    #[test_case(200, "{\"code\":\"x\"}", false => "retryable"; "object instead of array")]
    fn test_classification_table(status: u16, body: &str, ignore: bool) -> &'static str {
        match classify("orders", status, body, BodyShape::Array, ignore) {
            Classification::Success(_) => "success",
            Classification::Retryable(_) => "retryable",
            Classification::Fatal(_) => "fatal",
            Classification::Ignorable { .. } => "ignorable",
        }
    }

    #[test]
    fn test_any_shape_accepts_objects() {
        let result = classify(
            "system_status",
            200,
            "{\"environment\":{}}",
            BodyShape::Any,
            false,
        );
        assert!(matches!(result, Classification::Success(_)));
    }

    #[test]
    fn test_unauthorized_carries_path_and_status() {
        match classify("products", 401, "", BodyShape::Array, false) {
            Classification::Fatal(Error::Auth { path, status }) => {
                assert_eq!(path, "products");
                assert_eq!(status, 401);
            }
            other => panic!("Expected auth failure, got {other:?}"),
        }
    }

    #[test]
    fn test_client_error_keeps_body() {
        match classify("coupons", 404, "no route", BodyShape::Array, false) {
            Classification::Fatal(Error::Client { status, body, .. }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "no route");
            }
            other => panic!("Expected client error, got {other:?}"),
        }
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "x".repeat(2000);
        match classify("orders", 500, &body, BodyShape::Array, false) {
            Classification::Retryable(Error::Server { body, .. }) => {
                assert!(body.len() < 600);
                assert!(body.ends_with("..."));
            }
            other => panic!("Expected server error, got {other:?}"),
        }
    }
}
