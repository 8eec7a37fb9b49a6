//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (non-zero window, valid bind addresses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over the config structs
//! - Runs before a config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::{BackendConfig, FrontendConfig};

/// A single semantic problem found in a config.
#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Bind address does not parse as `host:port`.
    InvalidBindAddress(String),
    /// Peer hostname is empty.
    EmptyPeerHost,
    /// Peer port is zero.
    ZeroPeerPort,
    /// Breaker window must hold at least one outcome.
    ZeroWindowSize,
    /// Outbound request timeout must be non-zero.
    ZeroRequestTimeout,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "invalid bind address: {}", addr)
            }
            ValidationError::EmptyPeerHost => write!(f, "peer host must not be empty"),
            ValidationError::ZeroPeerPort => write!(f, "peer port must not be 0"),
            ValidationError::ZeroWindowSize => {
                write!(f, "circuit breaker window_size must be at least 1")
            }
            ValidationError::ZeroRequestTimeout => {
                write!(f, "request timeout must be at least 1 second")
            }
        }
    }
}

/// Validate a frontend config, collecting every problem.
pub fn validate_frontend(config: &FrontendConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_bind_address(&config.listener.bind_address, &mut errors);
    if config.peer.host.is_empty() {
        errors.push(ValidationError::EmptyPeerHost);
    }
    if config.peer.port == 0 {
        errors.push(ValidationError::ZeroPeerPort);
    }
    if config.circuit_breaker.window_size == 0 {
        errors.push(ValidationError::ZeroWindowSize);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a backend config, collecting every problem.
pub fn validate_backend(config: &BackendConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_bind_address(&config.listener.bind_address, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_bind_address(addr: &str, errors: &mut Vec<ValidationError>) {
    if addr.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(addr.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configs_are_valid() {
        assert!(validate_frontend(&FrontendConfig::default()).is_ok());
        assert!(validate_backend(&BackendConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = FrontendConfig::default();
        config.listener.bind_address = "nonsense".to_string();
        config.peer.host = String::new();
        config.peer.port = 0;
        config.circuit_breaker.window_size = 0;

        let errors = validate_frontend(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::EmptyPeerHost));
        assert!(errors.contains(&ValidationError::ZeroWindowSize));
    }

    #[test]
    fn rejects_unparseable_bind_address() {
        let mut config = BackendConfig::default();
        config.listener.bind_address = "0.0.0.0".to_string();
        let errors = validate_backend(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidBindAddress("0.0.0.0".to_string())]
        );
    }
}
