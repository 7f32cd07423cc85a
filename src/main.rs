//! frontdoor: a transparent reverse proxy for a single upstream.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────┐
//!                   │                  FRONTDOOR                   │
//!   Client Request  │  ┌────────┐   ┌────────────┐   ┌──────────┐  │
//!   ────────────────┼─▶│  http  │──▶│   proxy    │──▶│ upstream │──┼──▶ Upstream
//!                   │  │ server │   │ forwarder  │   │  client  │  │    Server
//!   Client Response │  └────────┘   └─────┬──────┘   └──────────┘  │
//!   ◀───────────────┼── response filter ◀─┘ or {"error": "..."}    │
//!                   │                                              │
//!                   │  config · observability · lifecycle          │
//!                   └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use frontdoor::config::{self, ConfigOverrides};
use frontdoor::lifecycle::startup;
use frontdoor::observability::logging;

#[derive(Parser)]
#[command(name = "frontdoor")]
#[command(about = "Transparent reverse proxy for a single upstream", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "FRONTDOOR_CONFIG")]
    config: Option<PathBuf>,

    /// Upstream address; a bare host:port gets https://.
    #[arg(short, long, env = "FRONTDOOR_UPSTREAM_URL")]
    upstream: Option<String>,

    /// Listener bind address (e.g. 0.0.0.0:8080).
    #[arg(short, long, env = "FRONTDOOR_BIND_ADDRESS")]
    bind: Option<String>,

    /// Listener port; replaces the port of the bind address.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        upstream_url: cli.upstream,
        bind_address: cli.bind,
        port: cli.port,
    };
    let config = config::load(cli.config.as_deref(), &overrides)?;

    logging::init(&config.observability);

    tracing::info!("frontdoor v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        connect_timeout_secs = config.timeouts.connect_secs,
        request_timeout_secs = config.timeouts.request_secs,
        cors_enabled = config.cors.enabled,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
