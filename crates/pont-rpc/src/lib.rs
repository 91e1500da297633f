//! JSON-RPC 2.0 bridging core for pont.
//!
//! pont sits between a local host that speaks newline-delimited JSON-RPC
//! 2.0 over stdin/stdout and a remote MCP server that speaks JSON-RPC 2.0
//! over HTTP POST bodies. This crate holds everything with actual logic;
//! the `pont` binary only wires it to real streams.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Proxy                                                      │
//! │  - frames chunks into records (LineFramer)                  │
//! │  - decodes + classifies each record                         │
//! │  - answers `initialize` locally, suppresses notifications   │
//! │  - forwards requests and normalizes whatever comes back     │
//! └─────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Forwarder (trait) / HttpForwarder                          │
//! │  - HTTP POST with bearer auth and a bounded timeout         │
//! │  - decoded payload verbatim, or a transport failure         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Processing is strictly sequential: each record runs to completion
//! (including the awaited remote call) before the next one starts, so
//! response order on stdout always matches request arrival order.
//!
//! Every failure while handling an identified request becomes a correlated
//! error line rather than a crash: `-32700` for unparseable input, `-32600`
//! for shape violations, `-32603` for anything that goes wrong upstream,
//! and `-32000` when the remote reports failure as a bare string.

pub mod error;
pub mod framing;
pub mod handshake;
pub mod normalize;
pub mod protocol;
pub mod proxy;
pub mod upstream;

// Re-export main types
pub use error::{PontError, Result};
pub use framing::{LineFramer, decode_line, recover_id};
pub use handshake::{INITIALIZE_METHOD, ServerIdentity, initialize_result};
pub use normalize::normalize;
pub use protocol::{
    Classification, InitializeResult, JSONRPC_VERSION, JsonRpcError, MCP_PROTOCOL_VERSION,
    NOTIFICATION_PREFIX, OutboundRequest, ServerCapabilities, ServerInfo, ToolsCapability,
    classify, error_envelope, result_envelope,
};
pub use proxy::Proxy;
pub use upstream::{DEFAULT_TIMEOUT, Forwarder, HttpForwarder, UpstreamConfig};
