//! Error types for the MCP server.

use thiserror::Error;

use crate::envelope::ErrorKind;

/// Errors raised while serving tool, resource and prompt calls.
#[derive(Debug, Error)]
pub enum McpError {
    /// A required argument was not supplied.
    #[error("Missing required argument: {0}")]
    MissingArg(String),

    /// An argument was supplied but failed validation.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArg {
        /// Argument name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// No tool is registered under this name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The resource URI did not match any known resource.
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// No prompt template is registered under this name.
    #[error("Unknown prompt: {0}")]
    UnknownPrompt(String),

    /// A local rate-limit threshold was hit.
    #[error("{0}")]
    RateLimited(String),

    /// The server is missing required configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The upstream API answered with a non-success status.
    #[error("API error ({status_code}): {message}")]
    Api {
        /// HTTP status returned upstream
        status_code: u16,
        /// Upstream error message
        message: String,
        /// Raw response body, if any
        raw_body: Option<String>,
    },

    /// Transport-level failure talking to the upstream API.
    #[error("Network error: {0}")]
    Network(String),

    /// The upstream call exceeded the configured timeout.
    #[error("Request timed out after {secs}s")]
    Timeout {
        /// Configured timeout in seconds
        secs: u64,
    },

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O failure on the transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything that should not happen.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl McpError {
    /// Shorthand for an [`McpError::InvalidArg`].
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        McpError::InvalidArg {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Envelope category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            McpError::MissingArg(_)
            | McpError::InvalidArg { .. }
            | McpError::UnknownTool(_)
            | McpError::UnknownResource(_)
            | McpError::UnknownPrompt(_) => ErrorKind::Validation,
            McpError::RateLimited(_) => ErrorKind::RateLimit,
            McpError::Configuration(_) => ErrorKind::Configuration,
            McpError::Api { .. } => ErrorKind::Api,
            McpError::Network(_) => ErrorKind::Network,
            McpError::Timeout { .. } => ErrorKind::Timeout,
            McpError::Json(_) | McpError::Io(_) | McpError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Tag placed in the `error_type` field of an error envelope.
    pub fn error_type(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Whether the error was produced locally, before any upstream call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            McpError::MissingArg(_)
                | McpError::InvalidArg { .. }
                | McpError::RateLimited(_)
                | McpError::Configuration(_)
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_types_cover_envelope_tags() {
        assert_eq!(McpError::MissingArg("x".into()).error_type(), "validation");
        assert_eq!(McpError::invalid("x", "bad").error_type(), "validation");
        assert_eq!(McpError::RateLimited("slow".into()).error_type(), "rate_limit");
        assert_eq!(McpError::Timeout { secs: 30 }.error_type(), "timeout");
        assert_eq!(McpError::Network("reset".into()).error_type(), "network");
        assert_eq!(McpError::UnknownTool("nope".into()).error_type(), "validation");
        assert_eq!(
            McpError::Api {
                status_code: 500,
                message: "boom".into(),
                raw_body: None
            }
            .error_type(),
            "api"
        );
    }

    #[test]
    fn api_error_message_includes_status() {
        let err = McpError::Api {
            status_code: 404,
            message: "Post not found".into(),
            raw_body: Some("{\"message\":\"Post not found\"}".into()),
        };
        assert_eq!(err.to_string(), "API error (404): Post not found");
        assert!(!err.is_local());
    }

    #[test]
    fn local_errors_never_reached_upstream() {
        assert!(McpError::MissingArg("post_text".into()).is_local());
        assert!(McpError::invalid("platforms", "unsupported").is_local());
        assert!(McpError::RateLimited("limit".into()).is_local());
        assert!(!McpError::Timeout { secs: 1 }.is_local());
        assert!(!McpError::Network("refused".into()).is_local());
    }
}
