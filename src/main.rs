//! Health endpoint for one service instance.
//!
//! # Architecture Overview
//!
//! ```text
//!   GET /health
//!   ────────────▶ http::server ──▶ HealthRegistry::check_health()
//!                                        │
//!                        ┌───────────────┼────────────────┐
//!                        ▼               ▼                ▼
//!                  database probe   peer probe  ...  peer probe
//!                   (SELECT 1)     (GET /health)    (GET /health)
//!                        └───────────────┼────────────────┘
//!                                        ▼   settle all, derive status
//!   ◀──────────── JSON HealthReport ─────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use service_health::config::{load_config, load_from_env};
use service_health::lifecycle::{build_registry, signals, Shutdown};
use service_health::observability::{logging, metrics};
use service_health::HttpServer;

#[derive(Parser)]
#[command(name = "service-health")]
#[command(about = "Serve the aggregated /health endpoint for one service", long_about = None)]
struct Args {
    /// TOML config file (defaults plus environment when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };

    logging::init_logging(&config.observability)?;

    tracing::info!(
        service = %config.service.name,
        version = %config.service.version,
        bind_address = %config.service.bind_address,
        peers = config.peers.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    // Every dependency is registered before the listener accepts traffic.
    let registry = build_registry(&config)?;

    let listener = TcpListener::bind(&config.service.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(&config, registry)
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
