//! forward-auth
//!
//! Credential check endpoint for a reverse proxy's forward-auth hook.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use shortcut_proxy::auth::{AuthServer, CredentialStore};
use shortcut_proxy::config::{load_config, Service};
use shortcut_proxy::lifecycle::{trigger_on_signal, Shutdown};
use shortcut_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "forward-auth")]
#[command(about = "Forward-auth credential check service", long_about = None)]
struct Cli {
    /// TOML configuration file. Environment variables override it.
    #[arg(short, long, env = "PROXY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), Service::ForwardAuth) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("forward-auth: {e}");
            std::process::exit(1);
        }
    };

    logging::init(&config.observability.log_level);

    let store = CredentialStore::from_config(&config.auth);
    tracing::info!(
        bind_address = %config.auth.bind_address,
        credentials = store.len(),
        "forward-auth v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let listener = TcpListener::bind(&config.auth.bind_address).await?;

    let shutdown = Shutdown::new();
    trigger_on_signal(&shutdown);

    AuthServer::new(store).run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
