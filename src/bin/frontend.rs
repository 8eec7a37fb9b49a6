//! Frontend service: serves the doorbell page and rings the backend through
//! the resilient call client.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use c2c_doorbell::client::RingClient;
use c2c_doorbell::config::load_frontend_config;
use c2c_doorbell::http::{self, frontend, FrontendState};
use c2c_doorbell::instance::InstanceInfo;
use c2c_doorbell::lifecycle::Shutdown;
use c2c_doorbell::observability::{logging, metrics};
use c2c_doorbell::resilience::CircuitBreaker;

#[derive(Parser)]
#[command(name = "frontend")]
#[command(about = "Doorbell frontend: rings the backend on every page view", long_about = None)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding the config file (e.g. "0.0.0.0:8080").
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_frontend_config(cli.config.as_deref())?;
    if let Some(listen) = cli.listen {
        config.listener.bind_address = listen;
    }

    logging::init_logging(&config.observability.log_level);

    let peer = format!("{}:{}", config.peer.host, config.peer.port);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        peer = %peer,
        load_balancing = config.load_balancing.enabled,
        breaker_window = config.circuit_breaker.window_size,
        breaker_open_ms = config.circuit_breaker.open_duration_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(error) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    %error,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let instance = InstanceInfo::from_env(&config.application_name);
    tracing::info!(instance = %instance, "Discovered instance identity");

    let breaker = Arc::new(CircuitBreaker::new(&config.circuit_breaker));
    let state = FrontendState {
        ring: Arc::new(RingClient::new(&config, breaker.clone())?),
        breaker,
        instance: Arc::new(instance),
        peer,
    };
    let router = frontend::build_router(&config, state);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    shutdown.listen_for_signals();

    http::serve("frontend", listener, router, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
