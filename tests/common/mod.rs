//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Map, Value as JsonValue};

use ayrshare_mcp::{
    Config, McpError, McpSession, RateLimiter, Result, Upstream, UpstreamRequest,
};

pub const TEST_API_KEY: &str = "test-api-key-0123456789";

/// Upstream stand-in that records every call.
///
/// Responses are keyed by path. A path queued with several responses hands
/// them out in order and repeats the last one. Unknown paths answer `{}`.
#[derive(Default)]
pub struct StubUpstream {
    responses: Mutex<HashMap<String, Vec<JsonValue>>>,
    failures: Mutex<HashMap<String, u16>>,
    calls: Mutex<Vec<UpstreamRequest>>,
    count: AtomicUsize,
}

impl StubUpstream {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer `path` with `response`.
    pub fn respond(self: &Arc<Self>, path: &str, response: JsonValue) -> Arc<Self> {
        self.responses
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push(response);
        Arc::clone(self)
    }

    /// Fail every call to `path` with an API error.
    pub fn fail(self: &Arc<Self>, path: &str, status_code: u16) -> Arc<Self> {
        self.failures
            .lock()
            .unwrap()
            .insert(path.to_string(), status_code);
        Arc::clone(self)
    }

    pub fn call_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<UpstreamRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> UpstreamRequest {
        self.calls
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no upstream call recorded")
    }
}

#[async_trait]
impl Upstream for StubUpstream {
    async fn call(&self, request: UpstreamRequest) -> Result<JsonValue> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(request.clone());

        if let Some(status_code) = self.failures.lock().unwrap().get(&request.path) {
            return Err(McpError::Api {
                status_code: *status_code,
                message: format!("stubbed failure for {}", request.path),
                raw_body: None,
            });
        }

        let mut responses = self.responses.lock().unwrap();
        Ok(match responses.get_mut(&request.path) {
            Some(queue) if queue.len() > 1 => queue.remove(0),
            Some(queue) => queue.first().cloned().unwrap_or_else(|| json!({})),
            None => json!({}),
        })
    }
}

/// Session over `upstream` with generous rate limits.
pub fn session(upstream: Arc<StubUpstream>) -> McpSession {
    limited_session(upstream, 1000, 10_000)
}

/// Session over `upstream` with explicit rate-limit thresholds.
pub fn limited_session(upstream: Arc<StubUpstream>, per_minute: u32, per_hour: u32) -> McpSession {
    let config = Config::with_api_key(TEST_API_KEY);
    McpSession::new(
        config,
        upstream,
        Arc::new(RateLimiter::new(per_minute, per_hour)),
    )
}

/// Build an argument map from a JSON object literal.
pub fn args(value: JsonValue) -> Map<String, JsonValue> {
    value.as_object().cloned().expect("arguments must be an object")
}
