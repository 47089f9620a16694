//! Uniform tool result shape.
//!
//! Success: `{"status": "success", ...payload}`.
//! Failure: `{"status": "error", "message": ..., "error_type": ...}`.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::McpError;

/// Failure category reported as `error_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad or missing arguments; never reached the network
    Validation,
    /// Local rate limit hit
    RateLimit,
    /// Server misconfigured
    Configuration,
    /// Upstream returned a non-success status
    Api,
    /// Transport failure
    Network,
    /// Upstream call exceeded the timeout
    Timeout,
    /// Unexpected internal fault
    Internal,
}

impl ErrorKind {
    /// Wire tag.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Api => "api",
            ErrorKind::Network => "network",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Operation-specific payload fields
    Success(Map<String, JsonValue>),
    /// Categorized, already-redacted failure
    Failure {
        /// Failure category
        kind: ErrorKind,
        /// Human-readable message
        message: String,
    },
}

impl Envelope {
    /// Wrap a payload.
    pub fn success(payload: Map<String, JsonValue>) -> Self {
        Envelope::Success(payload)
    }

    /// Convert an error, scrubbing any of `secrets` from its message.
    pub fn from_error(err: &McpError, secrets: &[String]) -> Self {
        Envelope::Failure {
            kind: err.kind(),
            message: redact(&err.to_string(), secrets),
        }
    }

    /// Whether this is a success envelope.
    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    /// Render as the JSON object returned to callers.
    pub fn to_json(&self) -> JsonValue {
        let mut obj = Map::new();
        match self {
            Envelope::Success(payload) => {
                obj.extend(payload.clone());
                obj.insert("status".to_string(), JsonValue::from("success"));
            }
            Envelope::Failure { kind, message } => {
                obj.insert("status".to_string(), JsonValue::from("error"));
                obj.insert("message".to_string(), JsonValue::from(message.as_str()));
                obj.insert("error_type".to_string(), JsonValue::from(kind.as_str()));
            }
        }
        JsonValue::Object(obj)
    }
}

/// Replace every occurrence of each non-empty secret with `***`.
pub fn redact(message: &str, secrets: &[String]) -> String {
    secrets
        .iter()
        .filter(|s| !s.is_empty())
        .fold(message.to_string(), |acc, secret| acc.replace(secret.as_str(), "***"))
}
