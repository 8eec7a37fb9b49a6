//! Resilient call client for the backend ring endpoint.
//!
//! # Data Flow
//! ```text
//! ring(visitor)
//!     → resilience::CircuitBreaker::permit()   (denied → fallback)
//!     → ring.rs      (build GET /ring?visitor=...)
//!     → dispatch.rs  (optional DNS balancing, request deadline)
//!     → resolver.rs  (fresh lookup per balanced call)
//!     → outcome      → resilience::CircuitBreaker::record()
//! ```
//!
//! # Design Decisions
//! - `ring` is total: every failure path lands on the fallback message
//! - Failures are classified (resolution, transport, timeout, protocol) but
//!   all count the same against the breaker
//! - No retries and no resolver caching

pub mod dispatch;
pub mod resolver;
pub mod ring;

pub use dispatch::{DispatchMode, Dispatcher};
pub use ring::{RingClient, FALLBACK_MESSAGE};

use std::time::Duration;
use thiserror::Error;

/// Reasons an attempted ring call can fail.
///
/// Every variant counts as one failure in the breaker window; the variant
/// only decides the label attached to logs and metrics.
#[derive(Debug, Error)]
pub enum CallError {
    /// DNS lookup failed or produced no usable address.
    #[error("failed to resolve {host}: {source}")]
    Resolution {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// Connection or transfer failed below the HTTP layer.
    #[error("transport error: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    /// No response within the configured deadline.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The peer answered, but not with a usable ring response.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl CallError {
    /// Compact reason label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            CallError::Resolution { .. } => "resolution",
            CallError::Transport(_) => "transport",
            CallError::Timeout(_) => "timeout",
            CallError::Protocol(_) => "protocol",
        }
    }
}
