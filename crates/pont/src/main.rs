//! pont - a stdio to HTTP bridge for remote MCP servers.
//!
//! Reads newline-delimited JSON-RPC 2.0 from stdin, forwards requests to a
//! remote MCP endpoint over HTTP POST, and writes one response line per
//! identified request to stdout. Logging goes to stderr (and optionally a
//! rolling file) — stdout carries protocol traffic only.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use pont_rpc::{HttpForwarder, Proxy, ServerIdentity, UpstreamConfig};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// pont - a stdio to HTTP bridge for remote MCP servers
#[derive(Parser)]
#[command(name = "pont")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Upstream MCP endpoint URL
    #[arg(long, env = "PONT_UPSTREAM_URL")]
    pub url: String,

    /// Bearer token for the upstream Authorization header
    #[arg(long, env = "PONT_AUTH_TOKEN")]
    pub auth_token: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Server name reported in the initialize handshake
    #[arg(long, default_value = "pont")]
    pub server_name: String,

    /// Server version reported in the initialize handshake
    #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
    pub server_version: String,

    /// Directory for rolling JSON log files (stderr-only when unset)
    #[arg(long, env = "PONT_LOG_DIR")]
    pub log_dir: Option<std::path::PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(&cli);

    tracing::info!(url = %cli.url, "pont starting");

    let mut config =
        UpstreamConfig::new(&cli.url).with_timeout(Duration::from_secs(cli.timeout_secs));
    if let Some(token) = &cli.auth_token {
        config = config.with_auth_token(token);
    }
    let forwarder = HttpForwarder::new(config)?;

    let identity = ServerIdentity {
        name: cli.server_name,
        version: cli.server_version,
    };
    let mut proxy = Proxy::new(forwarder, identity);

    let mut stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut buf = [0u8; 8192];

    tracing::info!("pont ready");

    loop {
        tokio::select! {
            read = stdin.read(&mut buf) => {
                // Unrecoverable stream faults are the only errors allowed
                // to end the process.
                let n = read?;
                if n == 0 {
                    tracing::info!("stdin closed, shutting down");
                    break;
                }
                for line in proxy.handle_chunk(&buf[..n]).await {
                    stdout.write_all(line.as_bytes()).await?;
                    stdout.write_all(b"\n").await?;
                    stdout.flush().await?;
                }
            }
            _ = shutdown_signal() => {
                tracing::info!("termination signal received, shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Initialize tracing — stderr (human-readable) + optional rotating JSON
/// file. Returns the appender guard so buffered log lines survive until
/// exit.
fn init_tracing(cli: &Cli) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::prelude::*;

    let filter = if cli.verbose {
        "pont=debug,pont_rpc=debug,info"
    } else {
        "pont=info,pont_rpc=info,warn"
    };

    // stdout is the protocol channel; all logging goes to stderr.
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::EnvFilter::new(filter));

    match &cli.log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "pont.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking)
                        .with_filter(tracing_subscriber::EnvFilter::new(
                            "pont=trace,pont_rpc=trace,info",
                        )),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(stderr_layer).init();
            None
        }
    }
}
