//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for a binary
//! - Derive the default filter from the configured log level
//!
//! # Design Decisions
//! - `RUST_LOG` always wins over the configured level
//! - One subscriber per process, installed once at startup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `level` comes from `observability.log_level` in the config and seeds the
/// default filter for this crate and tower_http. Setting `RUST_LOG` replaces
/// the default entirely.
pub fn init_logging(level: &str) {
    let default_directives = format!("c2c_doorbell={level},tower_http={level}");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directives)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
