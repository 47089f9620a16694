//! MCP server over JSON-RPC 2.0.
//!
//! [`McpServer`] is transport-agnostic: it turns one raw JSON-RPC message
//! into at most one response. [`McpServer::run_stdio`] serves newline
//! delimited messages on stdin/stdout; the HTTP transport lives in
//! [`crate::http`].
//!
//! Requests are handled concurrently. Responses on stdio are written by a
//! single writer task, so lines never interleave, but they may be written in
//! a different order than the requests arrived.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::SERVER_NAME;
use crate::envelope::redact;
use crate::error::{McpError, Result};
use crate::prompts::PromptRegistry;
use crate::resources::ResourceRegistry;
use crate::session::McpSession;
use crate::tools::ToolRegistry;

/// MCP protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;
/// MCP convention for an unknown resource URI.
const RESOURCE_NOT_FOUND: i32 = -32002;

/// JSON-RPC 2.0 request (or notification, when `id` is absent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version; must be "2.0"
    pub jsonrpc: String,
    /// Request id; absent for notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonValue>,
    /// Method name
    pub method: String,
    /// Method parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<JsonValue>,
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Always "2.0"
    pub jsonrpc: String,
    /// Id of the request being answered (null if it could not be read)
    pub id: JsonValue,
    /// Result on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    /// Error on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
}

impl JsonRpcError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }

    /// Map a protocol-level error, scrubbing secrets from the message.
    pub fn from_error(err: &McpError, secrets: &[String]) -> Self {
        let message = redact(&err.to_string(), secrets);
        let code = match err {
            McpError::UnknownResource(_) => RESOURCE_NOT_FOUND,
            McpError::UnknownTool(_)
            | McpError::UnknownPrompt(_)
            | McpError::MissingArg(_)
            | McpError::InvalidArg { .. } => INVALID_PARAMS,
            _ => INTERNAL_ERROR,
        };
        Self::new(code, message)
    }
}

impl JsonRpcResponse {
    /// Successful response.
    pub fn success(id: JsonValue, result: JsonValue) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Error response.
    pub fn error(id: JsonValue, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// MCP server: tools, resources and prompts bound to one session.
pub struct McpServer {
    session: McpSession,
    tools: ToolRegistry,
    resources: ResourceRegistry,
    prompts: PromptRegistry,
}

impl McpServer {
    /// Create a server with every registered tool, resource and prompt.
    pub fn new(session: McpSession) -> Self {
        Self {
            session,
            tools: ToolRegistry::new(),
            resources: ResourceRegistry::new(),
            prompts: PromptRegistry::new(),
        }
    }

    /// The session this server serves.
    pub fn session(&self) -> &McpSession {
        &self.session
    }

    /// Handle one raw JSON-RPC message.
    ///
    /// Returns `None` for notifications, which never get a response.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        let value: JsonValue = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Unparseable JSON-RPC message");
                return Some(JsonRpcResponse::error(
                    JsonValue::Null,
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(JsonValue::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id,
                    JsonRpcError::new(INVALID_REQUEST, format!("Invalid request: {}", e)),
                ));
            }
        };

        self.handle(request).await
    }

    /// Handle a decoded request.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id.unwrap_or(JsonValue::Null),
                JsonRpcError::new(INVALID_REQUEST, "jsonrpc must be \"2.0\""),
            ));
        }

        debug!(method = %request.method, "Handling request");
        let outcome = self.dispatch(&request.method, request.params).await;

        let id = match request.id {
            Some(id) => id,
            None => {
                if let Err(e) = &outcome {
                    debug!(method = %request.method, error = %e.message, "Notification failed");
                }
                return None;
            }
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    async fn dispatch(
        &self,
        method: &str,
        params: Option<JsonValue>,
    ) -> std::result::Result<JsonValue, JsonRpcError> {
        let params = match params {
            None | Some(JsonValue::Null) => Map::new(),
            Some(JsonValue::Object(map)) => map,
            Some(_) => return Err(JsonRpcError::invalid_params("params must be an object")),
        };

        match method {
            "initialize" => Ok(self.initialize(&params)),
            "notifications/initialized" | "initialized" => Ok(json!({})),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.tools.tools() })),
            "tools/call" => self.call_tool(params).await,
            "resources/list" => Ok(json!({ "resources": self.resources.resources() })),
            "resources/templates/list" => {
                Ok(json!({ "resourceTemplates": self.resources.templates() }))
            }
            "resources/read" => self.read_resource(&params).await,
            "prompts/list" => Ok(json!({ "prompts": self.prompts.prompts() })),
            "prompts/get" => self.get_prompt(&params),
            other => Err(JsonRpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )),
        }
    }

    fn initialize(&self, params: &Map<String, JsonValue>) -> JsonValue {
        let client = params
            .get("clientInfo")
            .and_then(|c| c.get("name"))
            .and_then(JsonValue::as_str)
            .unwrap_or("unknown");
        info!(client, "Client connected");

        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "subscribe": false, "listChanged": false },
                "prompts": { "listChanged": false }
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    async fn call_tool(
        &self,
        mut params: Map<String, JsonValue>,
    ) -> std::result::Result<JsonValue, JsonRpcError> {
        let name = match params.get("name").and_then(JsonValue::as_str) {
            Some(n) => n.to_string(),
            None => return Err(JsonRpcError::invalid_params("Missing tool name")),
        };
        let args = match params.remove("arguments") {
            None | Some(JsonValue::Null) => Map::new(),
            Some(JsonValue::Object(map)) => map,
            Some(_) => return Err(JsonRpcError::invalid_params("arguments must be an object")),
        };

        let envelope = self
            .tools
            .call(&self.session, &name, args)
            .await
            .map_err(|e| JsonRpcError::from_error(&e, self.session.secrets()))?;

        let text = serde_json::to_string_pretty(&envelope.to_json())
            .map_err(|e| JsonRpcError::new(INTERNAL_ERROR, e.to_string()))?;
        Ok(json!({
            "content": [{ "type": "text", "text": text }],
            "isError": !envelope.is_success()
        }))
    }

    async fn read_resource(
        &self,
        params: &Map<String, JsonValue>,
    ) -> std::result::Result<JsonValue, JsonRpcError> {
        let uri = params
            .get("uri")
            .and_then(JsonValue::as_str)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| JsonRpcError::invalid_params("Missing uri"))?;

        let envelope = self
            .resources
            .read(&self.session, uri)
            .await
            .map_err(|e| JsonRpcError::from_error(&e, self.session.secrets()))?;

        let text = serde_json::to_string_pretty(&envelope.to_json())
            .map_err(|e| JsonRpcError::new(INTERNAL_ERROR, e.to_string()))?;
        Ok(json!({
            "contents": [{ "uri": uri, "mimeType": "application/json", "text": text }]
        }))
    }

    fn get_prompt(
        &self,
        params: &Map<String, JsonValue>,
    ) -> std::result::Result<JsonValue, JsonRpcError> {
        let name = params
            .get("name")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| JsonRpcError::invalid_params("Missing prompt name"))?;
        let empty = Map::new();
        let args = match params.get("arguments") {
            None | Some(JsonValue::Null) => &empty,
            Some(JsonValue::Object(map)) => map,
            Some(_) => return Err(JsonRpcError::invalid_params("arguments must be an object")),
        };
        self.prompts
            .get(name, args)
            .map_err(|e| JsonRpcError::from_error(&e, self.session.secrets()))
    }

    /// Serve newline-delimited JSON-RPC on stdin/stdout until stdin closes.
    pub async fn run_stdio(self: Arc<Self>) -> Result<()> {
        info!("Starting MCP stdio transport");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await?;
        info!("Stdin closed, shutting down");
        Ok(())
    }

    /// Serve newline-delimited JSON-RPC on an arbitrary reader/writer pair.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<JsonRpcResponse>(64);
        let writer_task = tokio::spawn(write_responses(rx, writer));

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            let server = Arc::clone(&self);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_message(&line).await {
                    if tx.send(response).await.is_err() {
                        warn!("Response writer closed, dropping response");
                    }
                }
            });
        }

        // In-flight requests keep their own senders; the writer drains them
        // before it stops.
        drop(tx);
        writer_task
            .await
            .map_err(|e| McpError::Internal(format!("Response writer failed: {}", e)))?
    }
}

async fn write_responses<W>(mut rx: mpsc::Receiver<JsonRpcResponse>, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut line = serde_json::to_vec(&response)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_errors_map_to_codes() {
        let secrets = vec!["sekret".to_string()];
        let unknown = JsonRpcError::from_error(&McpError::UnknownTool("x".into()), &secrets);
        assert_eq!(unknown.code, INVALID_PARAMS);
        let resource = JsonRpcError::from_error(&McpError::UnknownResource("ayrshare://x".into()), &secrets);
        assert_eq!(resource.code, RESOURCE_NOT_FOUND);
        let internal = JsonRpcError::from_error(&McpError::Internal("key sekret leaked".into()), &secrets);
        assert_eq!(internal.code, INTERNAL_ERROR);
        assert!(!internal.message.contains("sekret"));
    }

    #[test]
    fn responses_serialize_without_empty_fields() {
        let ok = serde_json::to_value(JsonRpcResponse::success(json!(1), json!({}))).unwrap();
        assert_eq!(ok, json!({"jsonrpc": "2.0", "id": 1, "result": {}}));
        let err = serde_json::to_value(JsonRpcResponse::error(
            JsonValue::Null,
            JsonRpcError::new(PARSE_ERROR, "bad"),
        ))
        .unwrap();
        assert_eq!(
            err,
            json!({"jsonrpc": "2.0", "id": null, "error": {"code": -32700, "message": "bad"}})
        );
    }
}
