//! Backend service: answers the doorbell and counts visitors.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use c2c_doorbell::config::load_backend_config;
use c2c_doorbell::http::{self, backend, BackendState};
use c2c_doorbell::instance::InstanceInfo;
use c2c_doorbell::lifecycle::Shutdown;
use c2c_doorbell::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "backend")]
#[command(about = "Doorbell backend: thanks every visitor and counts them", long_about = None)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding the config file (e.g. "0.0.0.0:8081").
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_backend_config(cli.config.as_deref())?;
    if let Some(listen) = cli.listen {
        config.listener.bind_address = listen;
    }

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
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

    let router = backend::build_router(BackendState::new(instance));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    shutdown.listen_for_signals();

    http::serve("backend", listener, router, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
