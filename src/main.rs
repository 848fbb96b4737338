//! shortcut-proxy
//!
//! A validating reverse proxy in front of a URL-shortener API.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌────────────────────────────────────────────────┐
//!                       │                shortcut-proxy                  │
//!   Client Request      │  ┌────────┐   ┌────────────┐   ┌───────────┐   │
//!   ────────────────────┼─▶│  http  │──▶│ validation │──▶│   proxy   │───┼──▶ Upstream
//!                       │  │ server │   │  pipeline  │   │ forwarder │   │   (shortener)
//!                       │  └────────┘   └─────┬──────┘   └─────┬─────┘   │
//!   Client Response     │       ▲             │ 400/405        │         │
//!   ◀───────────────────┼───────┴─────────────┴────────────────┘         │
//!                       │                                                │
//!                       │   config · observability · lifecycle           │
//!                       └────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use shortcut_proxy::config::{load_config, Service};
use shortcut_proxy::http::HttpServer;
use shortcut_proxy::lifecycle::{trigger_on_signal, Shutdown};
use shortcut_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "shortcut-proxy")]
#[command(about = "Validating reverse proxy for a URL-shortener API", long_about = None)]
struct Cli {
    /// TOML configuration file. Environment variables override it.
    #[arg(short, long, env = "PROXY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), Service::Proxy) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("shortcut-proxy: {e}");
            std::process::exit(1);
        }
    };

    logging::init(&config.observability.log_level);

    tracing::info!("shortcut-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.target,
        forward_query = config.upstream.forward_query,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    error = %e,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    trigger_on_signal(&shutdown);

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
