//! JSON-RPC 2.0 protocol types and message classification.
//!
//! Inbound traffic is untrusted, so classification works on raw
//! `serde_json::Value`s; only the outbound request and the handshake
//! result get typed shapes. Identifier presence is semantically
//! meaningful here: a request may legitimately carry `"id": null`, which
//! is not the same thing as carrying no `id` field at all.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// JSON-RPC version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol version reported in the initialize handshake.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Reserved method-name prefix for notifications.
pub const NOTIFICATION_PREFIX: &str = "notifications/";

// ─────────────────────────────────────────────────────────────────────────────
// JSON-RPC Base Types
// ─────────────────────────────────────────────────────────────────────────────

/// A sanitized outbound JSON-RPC request.
///
/// Built fresh from the recognized fields of an inbound message — never a
/// pass-through — so stray client fields never reach the remote endpoint.
/// `id` is omitted for notifications; for requests `Some(Value::Null)`
/// serializes as an explicit `"id":null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundRequest {
    /// JSON-RPC version (always "2.0").
    pub jsonrpc: String,
    /// Request ID for correlating responses (absent for notifications).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Method name to call.
    pub method: String,
    /// Method parameters (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl OutboundRequest {
    /// Create an outbound request carrying an id.
    pub fn request(id: Value, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id),
            method: method.into(),
            params,
        }
    }

    /// Create an outbound notification (no id, no response expected).
    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: None,
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC error object.
///
/// `data` is always serialized, as explicit `null` when there is nothing
/// to report; hosts that pattern-match on the error shape rely on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,
    /// Error message.
    pub message: String,
    /// Auxiliary data (explicit `null` when absent).
    #[serde(default)]
    pub data: Value,
}

// Standard JSON-RPC error codes used by the bridge
impl JsonRpcError {
    /// Parse error - the inbound line is not valid JSON.
    pub const PARSE_ERROR: i64 = -32700;
    /// Invalid Request - not a valid Request object.
    pub const INVALID_REQUEST: i64 = -32600;
    /// Internal error - any fault while handling a validated request.
    pub const INTERNAL_ERROR: i64 = -32603;
    /// Upstream-reported error in a non-standard (string) shape.
    pub const UPSTREAM_ERROR: i64 = -32000;

    /// Create an error object.
    pub fn new(code: i64, message: impl Into<String>, data: Value) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }
}

/// Build a success response envelope.
pub fn result_envelope(id: &Value, result: Value) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "result": result,
    })
}

/// Build an error response envelope.
pub fn error_envelope(id: &Value, error: JsonRpcError) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "error": error,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Classification
// ─────────────────────────────────────────────────────────────────────────────

/// The shape of a decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// A well-formed request: id present (possibly null), method not in
    /// the notification namespace.
    Request {
        /// Correlating identifier (string, number, or null).
        id: Value,
        /// Method name.
        method: String,
        /// Parameters, if provided.
        params: Option<Value>,
    },
    /// A well-formed notification: method under `notifications/`, no id.
    Notification {
        /// Method name (including the namespace prefix).
        method: String,
        /// Parameters, if provided.
        params: Option<Value>,
    },
    /// Anything else.
    Invalid,
}

/// Classify a decoded inbound message.
///
/// Rules applied in order: the value must be an object, `jsonrpc` must be
/// exactly `"2.0"`, `method` must be a string; then notification-shaped
/// methods must omit `id` while all other methods must carry one (`null`
/// counts as present). No side effects beyond classification.
pub fn classify(value: &Value) -> Classification {
    let Some(obj) = value.as_object() else {
        return Classification::Invalid;
    };

    if obj.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Classification::Invalid;
    }

    let Some(method) = obj.get("method").and_then(Value::as_str) else {
        return Classification::Invalid;
    };

    let params = obj.get("params").cloned();

    if method.starts_with(NOTIFICATION_PREFIX) {
        if obj.contains_key("id") {
            return Classification::Invalid;
        }
        return Classification::Notification {
            method: method.to_string(),
            params,
        };
    }

    match obj.get("id") {
        Some(id) => Classification::Request {
            id: id.clone(),
            method: method.to_string(),
            params,
        },
        None => Classification::Invalid,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MCP Handshake Types
// ─────────────────────────────────────────────────────────────────────────────

/// Server capabilities declared during initialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// Tools capability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
    /// Resources capability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Value>,
    /// Prompts capability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts: Option<Value>,
    /// Logging capability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<Value>,
}

/// Tools capability details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    /// Whether the server supports listing tools that have changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Server identity reported during initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

/// Result of the initialize request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Protocol version.
    pub protocol_version: String,
    /// Server capabilities.
    pub capabilities: ServerCapabilities,
    /// Server info.
    pub server_info: ServerInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_request() {
        let value = json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"});
        assert_eq!(
            classify(&value),
            Classification::Request {
                id: json!(1),
                method: "tools/list".to_string(),
                params: None,
            }
        );
    }

    #[test]
    fn test_classify_request_with_params() {
        let value = json!({
            "jsonrpc": "2.0",
            "id": "abc",
            "method": "tools/call",
            "params": {"name": "query"},
        });
        let Classification::Request { id, params, .. } = classify(&value) else {
            panic!("expected request");
        };
        assert_eq!(id, json!("abc"));
        assert_eq!(params, Some(json!({"name": "query"})));
    }

    #[test]
    fn test_classify_null_id_is_a_request() {
        // id: null is present, just null — still a valid request.
        let value = json!({"jsonrpc": "2.0", "id": null, "method": "tools/list"});
        assert!(matches!(
            classify(&value),
            Classification::Request { id: Value::Null, .. }
        ));
    }

    #[test]
    fn test_classify_missing_id_is_invalid() {
        let value = json!({"jsonrpc": "2.0", "method": "tools/list"});
        assert_eq!(classify(&value), Classification::Invalid);
    }

    #[test]
    fn test_classify_notification() {
        let value = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
        assert_eq!(
            classify(&value),
            Classification::Notification {
                method: "notifications/initialized".to_string(),
                params: None,
            }
        );
    }

    #[test]
    fn test_classify_notification_with_id_is_invalid() {
        let value = json!({"jsonrpc": "2.0", "id": 5, "method": "notifications/initialized"});
        assert_eq!(classify(&value), Classification::Invalid);
    }

    #[test]
    fn test_classify_non_object_is_invalid() {
        assert_eq!(classify(&json!(42)), Classification::Invalid);
        assert_eq!(classify(&json!("hello")), Classification::Invalid);
        assert_eq!(classify(&json!([1, 2, 3])), Classification::Invalid);
        assert_eq!(classify(&Value::Null), Classification::Invalid);
    }

    #[test]
    fn test_classify_wrong_version_is_invalid() {
        let value = json!({"jsonrpc": "1.0", "id": 1, "method": "x"});
        assert_eq!(classify(&value), Classification::Invalid);

        let value = json!({"id": 1, "method": "x"});
        assert_eq!(classify(&value), Classification::Invalid);
    }

    #[test]
    fn test_classify_non_string_method_is_invalid() {
        let value = json!({"jsonrpc": "2.0", "id": 1, "method": 7});
        assert_eq!(classify(&value), Classification::Invalid);
    }

    #[test]
    fn test_outbound_request_omits_absent_fields() {
        let request = OutboundRequest::notification("notifications/initialized", None);
        let text = serde_json::to_string(&request).unwrap();
        assert!(!text.contains("\"id\""));
        assert!(!text.contains("\"params\""));
    }

    #[test]
    fn test_outbound_request_keeps_null_id() {
        let request = OutboundRequest::request(Value::Null, "tools/list", None);
        let text = serde_json::to_string(&request).unwrap();
        assert!(text.contains("\"id\":null"));
    }

    #[test]
    fn test_error_envelope_has_explicit_null_data() {
        let envelope = error_envelope(
            &json!(7),
            JsonRpcError::new(JsonRpcError::UPSTREAM_ERROR, "disk full", Value::Null),
        );
        assert_eq!(
            envelope,
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "error": {"code": -32000, "message": "disk full", "data": null},
            })
        );
    }

    #[test]
    fn test_result_envelope() {
        let envelope = result_envelope(&json!("a"), json!({"ok": true}));
        assert_eq!(
            envelope,
            json!({"jsonrpc": "2.0", "id": "a", "result": {"ok": true}})
        );
    }
}
