//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound ring call:
//!     → circuit_breaker.rs permit() (fail fast while the backend is down)
//!     → dispatch (deadline enforced by the client, see client::dispatch)
//!     → circuit_breaker.rs record() (outcome feeds the sliding window)
//! ```
//!
//! # Design Decisions
//! - No retries: a failed call is reported as failed, the breaker and the
//!   caller's fallback handle it
//! - Timeouts live in the dispatch layer; the breaker only sees outcomes
//! - Open → Half-Open happens lazily on the next permit, no background timer

pub mod circuit_breaker;

pub use circuit_breaker::{CallOutcome, CircuitBreaker, CircuitState};
