//! Repair of untrusted remote payloads into valid response envelopes.
//!
//! The remote endpoint is supposed to return JSON-RPC 2.0 responses, but
//! the bridge treats whatever comes back as untrusted and coerces it into
//! a well-formed envelope correlated to the original request.

use serde_json::{Value, json};

use crate::protocol::{JSONRPC_VERSION, JsonRpcError, error_envelope, result_envelope};

/// Normalize a decoded remote payload into a valid response envelope.
///
/// The rules are checked in a fixed priority order:
///
/// 1. Already a versioned response with `result` or `error` — kept intact
///    (extra fields included) with the id overwritten, since the remote's
///    self-reported id is never trusted.
/// 2. `error` is a bare string — wrapped into a structured `-32000` error
///    with the string as message and explicit null data.
/// 3. No `jsonrpc` field at all — the whole payload becomes the `result`.
/// 4. Anything else (a wrong-version shape, `null`, ...) — an empty object
///    becomes the `result`. Id and version are never omitted.
pub fn normalize(mut payload: Value, id: &Value) -> Value {
    let versioned = payload.get("jsonrpc").and_then(Value::as_str) == Some(JSONRPC_VERSION);
    if versioned && (payload.get("result").is_some() || payload.get("error").is_some()) {
        if let Some(obj) = payload.as_object_mut() {
            obj.insert("id".to_string(), id.clone());
        }
        return payload;
    }

    if let Some(message) = payload.get("error").and_then(Value::as_str) {
        return error_envelope(
            id,
            JsonRpcError::new(JsonRpcError::UPSTREAM_ERROR, message, Value::Null),
        );
    }

    if !payload.is_null() && payload.get("jsonrpc").is_none() {
        return result_envelope(id, payload);
    }

    result_envelope(id, json!({}))
}
