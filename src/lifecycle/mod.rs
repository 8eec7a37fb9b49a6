//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (per binary):
//!     Load config → Init logging/metrics → Build router → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C / SIGTERM → broadcast to waiters → axum drains in-flight
//!     requests → Exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
