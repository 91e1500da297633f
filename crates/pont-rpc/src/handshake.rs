//! Local handling of the capability-negotiation handshake.
//!
//! The remote endpoint is never consulted for `initialize`; the bridge
//! answers it with its own fixed capability descriptor so the host can
//! complete the handshake even when the upstream would reject or mangle
//! it.

use crate::protocol::{
    InitializeResult, MCP_PROTOCOL_VERSION, ServerCapabilities, ServerInfo, ToolsCapability,
};

/// The one method answered locally instead of being forwarded.
pub const INITIALIZE_METHOD: &str = "initialize";

/// Identity the bridge reports in the handshake result.
#[derive(Debug, Clone)]
pub struct ServerIdentity {
    /// Reported server name.
    pub name: String,
    /// Reported server version.
    pub version: String,
}

impl Default for ServerIdentity {
    fn default() -> Self {
        Self {
            name: "pont".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Build the fixed handshake result: protocol version, server identity,
/// and a capability set that declares an (empty) tools group.
pub fn initialize_result(identity: &ServerIdentity) -> InitializeResult {
    InitializeResult {
        protocol_version: MCP_PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability::default()),
            ..Default::default()
        },
        server_info: ServerInfo {
            name: identity.name.clone(),
            version: identity.version.clone(),
        },
    }
}
