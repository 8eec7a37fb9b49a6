//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: PORT, BACKEND_HOST, BACKEND_PORT)
//!     → validation.rs (semantic checks)
//!     → FrontendConfig / BackendConfig (validated, immutable)
//!     → shared with the subsystems that need it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults so the demo runs with no config file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_backend_config, load_frontend_config, ConfigError};
pub use schema::{
    BackendConfig, CircuitBreakerConfig, FrontendConfig, ListenerConfig, LoadBalancingConfig,
    ObservabilityConfig, PeerConfig, TimeoutConfig,
};
