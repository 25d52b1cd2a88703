//! Plenti admin gateway
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                    GATEWAY                            │
//!   Browser           │  ┌──────────┐   ┌────────────┐   ┌────────────────┐  │
//!   ──────────────────┼─▶│ request  │──▶│ route gate │──▶│ static pages   │  │
//!   (cookie: token)   │  │   id     │   │ (pages)    │   └────────────────┘  │
//!                     │  └────┬─────┘   └────────────┘                       │
//!                     │       │ /api/*                                       │
//!                     │       ▼                                              │
//!                     │  ┌──────────┐   ┌────────────┐   ┌────────────────┐  │
//!                     │  │ handlers │──▶│  session   │   │   upstream     │──┼──▶ Backend API
//!                     │  │          │──▶│ (cookie)   │   │  (reqwest)     │  │
//!                     │  └──────────┘   └────────────┘   └────────────────┘  │
//!                     └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use plenti_gateway::config::{load_config, load_from_env};
use plenti_gateway::lifecycle::signals::spawn_signal_handler;
use plenti_gateway::observability::{logging, metrics};
use plenti_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "plenti-gateway")]
#[command(about = "Session gateway for the Plenti admin dashboard", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "plenti-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        environment = ?config.environment,
        backend_configured = config.backend.base_url.is_some(),
        tls = config.listener.tls.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
