//! The per-record pipeline: frame, decode, classify, intercept, forward,
//! normalize.
//!
//! Each record is carried to completion — through emission or suppression
//! — before the next one starts, so output order always matches arrival
//! order. The framer's buffer tail is the only state that outlives a
//! record.

use serde_json::Value;

use crate::framing::{LineFramer, decode_line, recover_id};
use crate::handshake::{INITIALIZE_METHOD, ServerIdentity, initialize_result};
use crate::normalize::normalize;
use crate::protocol::{
    Classification, JsonRpcError, OutboundRequest, classify, error_envelope, result_envelope,
};
use crate::upstream::Forwarder;

/// The bridge pipeline.
pub struct Proxy<F> {
    framer: LineFramer,
    forwarder: F,
    identity: ServerIdentity,
}

impl<F: Forwarder> Proxy<F> {
    /// Create a pipeline around a forwarder and a reported identity.
    pub fn new(forwarder: F, identity: ServerIdentity) -> Self {
        Self {
            framer: LineFramer::new(),
            forwarder,
            identity,
        }
    }

    /// Feed a chunk of raw input and return one serialized single-line
    /// envelope per non-suppressed record, in arrival order.
    pub async fn handle_chunk(&mut self, chunk: &[u8]) -> Vec<String> {
        let lines = self.framer.push(chunk);
        let mut out = Vec::with_capacity(lines.len());
        for line in lines {
            if let Some(envelope) = self.handle_line(&line).await {
                out.push(envelope);
            }
        }
        out
    }

    /// Process one framed record. Returns the response line to emit, or
    /// `None` when the record is a notification (which never gets a
    /// reply, even on failure).
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        tracing::debug!(raw = %line, "inbound record");

        let value = match decode_line(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "parse error on inbound line");
                let id = recover_id(line).unwrap_or(Value::Null);
                let envelope = error_envelope(
                    &id,
                    JsonRpcError::new(
                        JsonRpcError::PARSE_ERROR,
                        "Parse error",
                        Value::String(e.to_string()),
                    ),
                );
                return Some(envelope.to_string());
            }
        };

        match classify(&value) {
            Classification::Invalid => {
                tracing::warn!("invalid JSON-RPC request");
                let id = value.get("id").cloned().unwrap_or(Value::Null);
                let envelope = error_envelope(
                    &id,
                    JsonRpcError::new(
                        JsonRpcError::INVALID_REQUEST,
                        "Invalid Request",
                        Value::String("Malformed JSON-RPC request".to_string()),
                    ),
                );
                Some(envelope.to_string())
            }
            Classification::Notification { method, params } => {
                // The notification contract forbids a reply; forwarding
                // failures are logged and swallowed.
                tracing::debug!(method = %method, "forwarding notification");
                let request = OutboundRequest::notification(&method, params);
                if let Err(e) = self.forwarder.forward(&request).await {
                    tracing::warn!(method = %method, error = %e, "notification forward failed");
                }
                None
            }
            Classification::Request { id, method, params } => {
                if method == INITIALIZE_METHOD {
                    tracing::debug!("answering initialize locally");
                    let result = serde_json::json!(initialize_result(&self.identity));
                    return Some(result_envelope(&id, result).to_string());
                }

                tracing::debug!(method = %method, "forwarding request");
                let request = OutboundRequest::request(id.clone(), &method, params);
                let envelope = match self.forwarder.forward(&request).await {
                    Ok(payload) => normalize(payload, &id),
                    Err(e) => {
                        tracing::error!(method = %method, error = %e, "request handling failed");
                        error_envelope(
                            &id,
                            JsonRpcError::new(
                                JsonRpcError::INTERNAL_ERROR,
                                "Internal error",
                                Value::String(e.to_string()),
                            ),
                        )
                    }
                };
                Some(envelope.to_string())
            }
        }
    }
}
