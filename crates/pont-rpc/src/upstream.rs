//! Upstream transport: HTTP POST forwarding to the remote endpoint.
//!
//! The pipeline only sees the [`Forwarder`] trait — "send a request
//! object, get back a decoded payload or a transport failure" — so tests
//! can script the remote side without a network.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{PontError, Result};
use crate::protocol::OutboundRequest;

/// Default upstream request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the HTTP upstream.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Endpoint URL of the remote JSON-RPC server.
    pub url: String,
    /// Bearer token for the `Authorization` header, if any.
    pub auth_token: Option<String>,
    /// Request timeout; expiry aborts the in-flight call.
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            auth_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl UpstreamConfig {
    /// Create a new config with the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the bearer token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The single capability the pipeline needs from the outside world.
#[async_trait]
pub trait Forwarder: Send + Sync {
    /// Deliver one outbound request and return the decoded response
    /// payload verbatim, or a transport failure with a readable cause.
    async fn forward(&self, request: &OutboundRequest) -> Result<Value>;
}

/// HTTP forwarder backed by a pooled `reqwest` client.
#[derive(Debug)]
pub struct HttpForwarder {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl HttpForwarder {
    /// Create a forwarder for the configured upstream.
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let _parsed = url::Url::parse(&config.url)
            .map_err(|e| PontError::transport(format!("invalid URL: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(5)
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(|e| PontError::transport(format!("failed to build HTTP client: {}", e)))?;

        tracing::info!(
            url = %config.url,
            timeout_secs = config.timeout.as_secs(),
            "created upstream forwarder"
        );

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Forwarder for HttpForwarder {
    async fn forward(&self, request: &OutboundRequest) -> Result<Value> {
        let json = serde_json::to_string(request)?;

        tracing::trace!(
            url = %self.config.url,
            json = %json,
            "sending upstream request"
        );

        let mut req = self
            .client
            .post(&self.config.url)
            .body(json)
            .header("Content-Type", "application/json");
        if let Some(token) = &self.config.auth_token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                PontError::transport("request timed out")
            } else {
                PontError::transport(format!("HTTP request failed: {}", e))
            }
        })?;

        // The status line is not authoritative: MCP servers routinely pair
        // an error status with a JSON-RPC error body, so the body is
        // decoded regardless and normalization sorts out the shape.
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| PontError::transport(format!("failed to read response body: {}", e)))?;

        if body.trim().is_empty() {
            return Err(PontError::transport(format!(
                "empty response from upstream (HTTP {})",
                status
            )));
        }

        tracing::trace!(status = %status, json = %body, "received upstream response");

        // An undecodable body means the remote violated the protocol; that
        // is a transport failure, not an inbound parse error.
        serde_json::from_str(&body).map_err(|e| {
            PontError::transport(format!("invalid JSON from upstream (HTTP {}): {}", status, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = UpstreamConfig::new("https://example.com/mcp");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn test_config_builders() {
        let config = UpstreamConfig::new("https://example.com/mcp")
            .with_auth_token("sekrit")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.auth_token.as_deref(), Some("sekrit"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = HttpForwarder::new(UpstreamConfig::new("not a url")).unwrap_err();
        assert!(err.to_string().contains("invalid URL"));
    }
}
