//! Container-to-container doorbell demo.
//!
//! Two services: a frontend that greets visitors and a backend that answers
//! the doorbell. The frontend reaches the backend through a resilient call
//! client: a circuit breaker, a fallback value and an optional DNS-driven
//! load-balancing dispatcher.
//!
//! ```text
//! GET / ──▶ frontend handler ──▶ RingClient::ring
//!                                    │ CircuitBreaker::permit
//!                                    ▼
//!                                Dispatcher::dispatch ──▶ resolver
//!                                    │          (when balancing enabled)
//!                                    ▼
//!                                GET /ring?visitor=... on the backend
//!                                    │
//!                                    ▼
//!                                outcome recorded, message or fallback
//! ```

// Core subsystems
pub mod client;
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod instance;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use client::{RingClient, FALLBACK_MESSAGE};
pub use config::{BackendConfig, FrontendConfig};
pub use instance::InstanceInfo;
pub use lifecycle::Shutdown;
pub use resilience::{CircuitBreaker, CircuitState};
