//! WebSocket handshake test fixture.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client                ┌──────────────────────────────────────────────────┐
//!     ──────────────────────┼─▶ net::listener ──▶ http::server (read head)     │
//!                           │                         │                        │
//!                           │          upgrade headers│      plain request     │
//!                           │                ▼        └──────────▼             │
//!                           │     handshake::directive      hyper http1        │
//!                           │     handshake::response       http::pages        │
//!                           │     handshake::responder      (axum router)      │
//!                           │                │                                 │
//!                           │                ▼                                 │
//!                           │     session::echo (tokio-tungstenite)            │
//!                           └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use ws_handshake_fixture::config::resolve_config;
use ws_handshake_fixture::lifecycle::{spawn_ctrl_c_handler, Shutdown};
use ws_handshake_fixture::net::Listener;
use ws_handshake_fixture::observability::init_tracing;
use ws_handshake_fixture::FixtureServer;

#[derive(Parser)]
#[command(name = "ws-handshake-fixture")]
#[command(about = "HTTP server producing edge-case WebSocket handshakes", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listening port (overrides the config file).
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    tracing::info!("ws-handshake-fixture v{} starting", env!("CARGO_PKG_VERSION"));

    let config = resolve_config(cli.config.as_deref(), cli.port)?;

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        max_connections = config.listener.max_connections,
        max_message_bytes = config.session.max_message_bytes,
        index_path = %config.assets.index_path,
        "Configuration loaded"
    );

    let listener = Listener::bind(&config.listener).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!("Server running on http://localhost:{}", local_addr.port());

    let shutdown = Shutdown::new();
    spawn_ctrl_c_handler(shutdown.clone());

    let server = FixtureServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
