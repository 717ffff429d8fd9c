//! forwarded-ip server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client / proxy ──▶ listener ──▶ client_ip middleware ──▶ report handler
//!                                         │                        │
//!                                         ▼                        ▼
//!                             net (parse, classify)      forwarding header
//!                             forwarding (resolve)       for the next hop
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use forwarded_ip::config::{load_config, Config};
use forwarded_ip::lifecycle::{signals, Shutdown};
use forwarded_ip::observability;
use forwarded_ip::HttpServer;

#[derive(Parser)]
#[command(name = "forwarded-ip")]
#[command(about = "Reports the resolved client address of each request", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "FORWARDED_IP_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    observability::logging::init(&config.observability);
    tracing::info!("forwarded-ip v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        header = %config.forwarding.header_name,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
