//! MCP session state.
//!
//! Bundles the shared pieces every call needs: configuration, the upstream
//! handle and the rate limiter. Cloning is cheap; clones share the same
//! limiter counters.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::client::{AyrshareClient, Upstream, UpstreamRequest};
use crate::config::Config;
use crate::envelope::redact;
use crate::error::Result;
use crate::limiter::RateLimiter;

/// Shared per-process session.
#[derive(Clone)]
pub struct McpSession {
    config: Arc<Config>,
    upstream: Arc<dyn Upstream>,
    limiter: Arc<RateLimiter>,
    secrets: Arc<[String]>,
}

impl McpSession {
    /// Create a session from explicit parts.
    pub fn new(config: Config, upstream: Arc<dyn Upstream>, limiter: Arc<RateLimiter>) -> Self {
        let secrets: Arc<[String]> = config.secrets().into();
        Self {
            config: Arc::new(config),
            upstream,
            limiter,
            secrets,
        }
    }

    /// Create a session talking to the real API, with a limiter built from
    /// the configured thresholds.
    pub fn from_config(config: Config) -> Result<Self> {
        let upstream = Arc::new(AyrshareClient::new(&config)?);
        let limiter = Arc::new(RateLimiter::new(
            config.rate_limit_per_minute,
            config.rate_limit_per_hour,
        ));
        Ok(Self::new(config, upstream, limiter))
    }

    /// Process configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared rate limiter.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Count one call against the rate limit, or reject it.
    pub fn admit(&self) -> Result<()> {
        self.limiter.try_acquire()
    }

    /// Issue one upstream call.
    pub async fn execute(&self, request: UpstreamRequest) -> Result<JsonValue> {
        self.upstream.call(request).await
    }

    /// Values that must be scrubbed from anything leaving the process.
    pub fn secrets(&self) -> &[String] {
        &self.secrets
    }

    /// Scrub configured keys from a message.
    pub fn redact(&self, message: &str) -> String {
        redact(message, &self.secrets)
    }
}

impl std::fmt::Debug for McpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpSession")
            .field("config", &self.config)
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}
