//! Error types for the WooCommerce tap
//!
//! Every public API returns `Result<T, Error>`. HTTP failures carry the
//! resource path and status so fatal messages are actionable on their own.

use thiserror::Error;

/// The main error type for the tap
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("Transport failure for '{path}': {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Authentication failed for '{path}' (HTTP {status}): check consumer_key and consumer_secret")]
    Auth { path: String, status: u16 },

    #[error("Request to '{path}' was rejected (HTTP {status}): {body}")]
    Client {
        path: String,
        status: u16,
        body: String,
    },

    #[error("Server error for '{path}' (HTTP {status}): {body}")]
    Server {
        path: String,
        status: u16,
        body: String,
    },

    #[error("Malformed response from '{path}' (HTTP {status}): {message}")]
    MalformedResponse {
        path: String,
        status: u16,
        message: String,
    },

    #[error("Giving up on '{path}' after {attempts} attempts: {last}")]
    RetriesExhausted {
        path: String,
        attempts: u32,
        #[source]
        last: Box<Error>,
    },

    #[error("Pagination loop on '{path}': page {page} was produced twice in a row")]
    PaginationLoop { path: String, page: u32 },

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("JSONPath error: {message}")]
    JsonPath { message: String },

    #[error("Undefined variable in path template: {variable}")]
    UndefinedVariable { variable: String },

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // State Errors
    // ============================================================================
    #[error("State error: {message}")]
    State { message: String },

    // ============================================================================
    // Run Errors
    // ============================================================================
    #[error("Stream '{stream}' not found in catalog")]
    StreamNotFound { stream: String },

    #[error("{count} stream(s) failed: {streams}")]
    StreamsFailed { count: usize, streams: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a JSONPath error
    pub fn json_path(message: impl Into<String>) -> Self {
        Self::JsonPath {
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Create a transport error for a path
    pub fn transport(path: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            path: path.into(),
            source,
        }
    }

    /// Check if this error is retryable
    ///
    /// Transport failures, server errors (5xx, 429) and unparseable bodies
    /// are transient. Everything else is fatal at the first attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Transport { .. } | Error::Server { .. } | Error::MalformedResponse { .. }
        )
    }

    /// Check if this error must abort the whole run rather than one stream
    ///
    /// Bad credentials affect every stream; output and state failures mean
    /// nothing further can be delivered.
    pub fn is_run_fatal(&self) -> bool {
        match self {
            Error::Auth { .. } | Error::Output { .. } | Error::State { .. } | Error::Io(_) => true,
            Error::RetriesExhausted { last, .. } => last.is_run_fatal(),
            _ => false,
        }
    }

    /// Resource path the error refers to, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::Transport { path, .. }
            | Error::Auth { path, .. }
            | Error::Client { path, .. }
            | Error::Server { path, .. }
            | Error::MalformedResponse { path, .. }
            | Error::RetriesExhausted { path, .. }
            | Error::PaginationLoop { path, .. } => Some(path),
            _ => None,
        }
    }

    /// HTTP status the error refers to, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Auth { status, .. }
            | Error::Client { status, .. }
            | Error::Server { status, .. }
            | Error::MalformedResponse { status, .. } => Some(*status),
            Error::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            Error::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }
}

/// Result type alias for the tap
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn server(status: u16) -> Error {
        Error::Server {
            path: "orders".to_string(),
            status,
            body: String::new(),
        }
    }

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("consumer_key");
        assert_eq!(err.to_string(), "Missing required config field: consumer_key");

        let err = Error::Client {
            path: "coupons".to_string(),
            status: 404,
            body: "Not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request to 'coupons' was rejected (HTTP 404): Not found"
        );
    }

    #[test]
    fn test_fatal_messages_name_path_and_status() {
        let err = Error::Auth {
            path: "products".to_string(),
            status: 401,
        };
        let msg = err.to_string();
        assert!(msg.contains("products"));
        assert!(msg.contains("401"));

        let err = Error::RetriesExhausted {
            path: "orders".to_string(),
            attempts: 10,
            last: Box::new(server(503)),
        };
        let msg = err.to_string();
        assert!(msg.contains("orders"));
        assert!(msg.contains("503"));
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_is_retryable() {
        assert!(server(500).is_retryable());
        assert!(server(429).is_retryable());
        assert!(Error::MalformedResponse {
            path: "orders".to_string(),
            status: 200,
            message: "expected array".to_string(),
        }
        .is_retryable());

        assert!(!Error::Auth {
            path: "orders".to_string(),
            status: 401
        }
        .is_retryable());
        assert!(!Error::Client {
            path: "orders".to_string(),
            status: 400,
            body: String::new()
        }
        .is_retryable());
        assert!(!Error::PaginationLoop {
            path: "orders".to_string(),
            page: 3
        }
        .is_retryable());
        assert!(!Error::config("test").is_retryable());
    }

    #[test]
    fn test_is_run_fatal() {
        let auth = Error::Auth {
            path: "orders".to_string(),
            status: 401,
        };
        assert!(auth.is_run_fatal());
        assert!(Error::output("stdout closed").is_run_fatal());
        assert!(Error::RetriesExhausted {
            path: "orders".to_string(),
            attempts: 1,
            last: Box::new(Error::Auth {
                path: "orders".to_string(),
                status: 401,
            }),
        }
        .is_run_fatal());
        assert!(!server(500).is_run_fatal());
        assert!(!Error::PaginationLoop {
            path: "orders".to_string(),
            page: 2
        }
        .is_run_fatal());
    }

    #[test]
    fn test_path_accessor() {
        assert_eq!(server(500).path(), Some("orders"));
        assert_eq!(Error::config("x").path(), None);
    }
}
