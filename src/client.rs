//! Upstream API client.
//!
//! [`Upstream`] is the seam every tool handler and resource aggregator calls
//! through. [`AyrshareClient`] is the production implementation on top of
//! reqwest; tests substitute a recording stub.

use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value as JsonValue};
use tracing::debug;

use crate::config::Config;
use crate::error::{McpError, Result};

/// HTTP verbs used by the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl HttpMethod {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// One outbound call: method, path relative to the API root, optional JSON
/// body and query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Path relative to the base URL, e.g. `/post`
    pub path: String,
    /// JSON request body
    pub body: Option<JsonValue>,
    /// Query string parameters, in order
    pub query: Vec<(String, String)>,
}

impl UpstreamRequest {
    /// Build a request without body or query.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
        }
    }

    /// `GET path`
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// `POST path` with a JSON body.
    pub fn post(path: impl Into<String>, body: JsonValue) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    /// `PUT path` with a JSON body.
    pub fn put(path: impl Into<String>, body: JsonValue) -> Self {
        Self::new(HttpMethod::Put, path).with_body(body)
    }

    /// `PATCH path` with a JSON body.
    pub fn patch(path: impl Into<String>, body: JsonValue) -> Self {
        Self::new(HttpMethod::Patch, path).with_body(body)
    }

    /// `DELETE path`
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Append a query parameter.
    pub fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Append a query parameter when the value is present.
    pub fn with_optional_query(self, key: &str, value: Option<String>) -> Self {
        match value {
            Some(v) => self.with_query(key, v),
            None => self,
        }
    }
}

/// Authenticated gateway to the upstream REST API.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Perform one call and decode the JSON response.
    ///
    /// Non-2xx responses become [`McpError::Api`], transport failures
    /// [`McpError::Network`] and expired deadlines [`McpError::Timeout`].
    async fn call(&self, request: UpstreamRequest) -> Result<JsonValue>;
}

/// reqwest-backed [`Upstream`] for the Ayrshare API.
pub struct AyrshareClient {
    http: Client,
    base_url: String,
    api_key: String,
    profile_key: Option<String>,
    timeout_secs: u64,
}

impl AyrshareClient {
    /// Build a client from validated configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| McpError::Configuration("API key required".to_string()))?
            .to_string();

        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("ayrshare-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| McpError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            profile_key: config.profile_key().map(str::to_string),
            timeout_secs: config.timeout_secs,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn transport_error(&self, e: reqwest::Error) -> McpError {
        if e.is_timeout() {
            McpError::Timeout {
                secs: self.timeout_secs,
            }
        } else {
            // Drop the URL so query values never end up in messages.
            McpError::Network(e.without_url().to_string())
        }
    }
}

impl fmt::Debug for AyrshareClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AyrshareClient")
            .field("base_url", &self.base_url)
            .field("profile_key", &self.profile_key.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[async_trait]
impl Upstream for AyrshareClient {
    async fn call(&self, request: UpstreamRequest) -> Result<JsonValue> {
        debug!(method = %request.method, path = %request.path, "Upstream request");

        let mut builder = self
            .http
            .request(request.method.as_reqwest(), self.url(&request.path))
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json");

        if let Some(profile_key) = &self.profile_key {
            builder = builder.header("Profile-Key", profile_key);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        debug!(status = status.as_u16(), path = %request.path, "Upstream response");

        if !status.is_success() {
            return Err(api_error(status, text));
        }

        if text.trim().is_empty() {
            return Ok(json!({}));
        }

        serde_json::from_str(&text).map_err(|e| McpError::Api {
            status_code: status.as_u16(),
            message: format!("Invalid JSON in response: {}", e),
            raw_body: Some(text),
        })
    }
}

fn api_error(status: StatusCode, text: String) -> McpError {
    let message = if status == StatusCode::UNAUTHORIZED {
        "Invalid API key or authentication failed".to_string()
    } else {
        serde_json::from_str::<JsonValue>(&text)
            .ok()
            .and_then(|body| body.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| {
                if text.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                } else {
                    text.clone()
                }
            })
    };

    McpError::Api {
        status_code: status.as_u16(),
        message,
        raw_body: (!text.is_empty()).then_some(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_prefers_message_field() {
        let err = api_error(
            StatusCode::BAD_REQUEST,
            r#"{"status":"error","message":"Post text required"}"#.to_string(),
        );
        match err {
            McpError::Api {
                status_code,
                message,
                raw_body,
            } => {
                assert_eq!(status_code, 400);
                assert_eq!(message, "Post text required");
                assert!(raw_body.is_some());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn api_error_falls_back_to_text_then_reason() {
        match api_error(StatusCode::BAD_GATEWAY, "upstream down".to_string()) {
            McpError::Api { message, .. } => assert_eq!(message, "upstream down"),
            other => panic!("unexpected error: {:?}", other),
        }
        match api_error(StatusCode::NOT_FOUND, String::new()) {
            McpError::Api {
                message, raw_body, ..
            } => {
                assert_eq!(message, "Not Found");
                assert!(raw_body.is_none());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn unauthorized_has_fixed_message() {
        match api_error(StatusCode::UNAUTHORIZED, r#"{"message":"nope"}"#.to_string()) {
            McpError::Api { message, .. } => {
                assert_eq!(message, "Invalid API key or authentication failed")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn request_builders() {
        let req = UpstreamRequest::get("/profiles")
            .with_query("limit", "100")
            .with_optional_query("cursor", None)
            .with_optional_query("title", Some("Acme".into()));
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.query,
            vec![
                ("limit".to_string(), "100".to_string()),
                ("title".to_string(), "Acme".to_string())
            ]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn client_requires_api_key() {
        let mut config = Config::with_api_key("k");
        config.api_key = None;
        assert!(matches!(
            AyrshareClient::new(&config),
            Err(McpError::Configuration(_))
        ));
    }

    #[test]
    fn debug_hides_api_key() {
        let client = AyrshareClient::new(&Config::with_api_key("secret-key-123")).unwrap();
        assert!(!format!("{:?}", client).contains("secret-key-123"));
    }
}
