//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID is attached at the HTTP layer and flows through log events
//! - Metric recording is a no-op until an exporter is installed
//! - The exporter is opt-in per binary via config

pub mod logging;
pub mod metrics;
