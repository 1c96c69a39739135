//! Key-injecting JSON-RPC reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 RPC PROXY                    │
//!   Client Request   │  ┌────────┐   ┌──────────┐   ┌────────────┐  │
//!   ─────────────────┼─▶│  http  │──▶│ security │──▶│  upstream  │──┼──▶ Provider
//!                    │  │ server │   │ cors/key │   │  forward   │  │    (Alchemy)
//!                    │  └────────┘   └──────────┘   └────────────┘  │
//!   Client Response  │       ▲                            │         │
//!   ◀────────────────┼───────┴──── redact key ◀───────────┘         │
//!                    │                                              │
//!                    │  cross-cutting: config · lifecycle · tracing │
//!                    └──────────────────────────────────────────────┘
//! ```
//!
//! One handler, three terminal paths: OPTIONS preflight, WebSocket
//! relay, HTTP forward (success relay or JSON-RPC error envelope).

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rpc_proxy::config;
use rpc_proxy::config::validation::validate_config;
use rpc_proxy::lifecycle::Shutdown;
use rpc_proxy::HttpServer;

/// Command-line overrides for environment-sourced configuration.
#[derive(Debug, Parser)]
#[command(name = "rpc-proxy", version, about = "Key-injecting JSON-RPC reverse proxy")]
struct Cli {
    /// Bind address (overrides PROXY_BIND_ADDRESS).
    #[arg(long)]
    bind: Option<String>,

    /// Upstream network subdomain (overrides ALCHEMY_NETWORK).
    #[arg(long)]
    network: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rpc_proxy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("rpc-proxy v0.1.0 starting");

    let cli = Cli::parse();
    let mut config = config::load_from_env()?;

    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(network) = cli.network {
        config.upstream.network = network;
        // Overrides bypass the loader, so re-check.
        validate_config(&config)
            .map_err(|errors| format!("invalid --network: {}", errors[0]))?;
    }

    // The API key itself is never logged.
    tracing::info!(
        bind_address = %config.listener.bind_address,
        network = %config.upstream.network,
        allowed_origins = ?config.cors.allowed_origins,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
