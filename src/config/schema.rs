//! Configuration schema definitions.
//!
//! One root struct per service. All types derive Serde traits for
//! deserialization from TOML config files, and every field has a default so
//! a minimal (or absent) config file is enough to run the demo.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the frontend service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Application name reported in responses when the platform does not
    /// provide one (see [`crate::instance::InstanceInfo`]).
    pub application_name: String,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Logical peer endpoint of the backend service.
    pub peer: PeerConfig,

    /// Client-side DNS load balancing toggle.
    pub load_balancing: LoadBalancingConfig,

    /// Circuit breaker settings for the outbound ring call.
    pub circuit_breaker: CircuitBreakerConfig,

    /// Outbound call timeouts.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            application_name: "frontend".to_string(),
            listener: ListenerConfig::default(),
            peer: PeerConfig::default(),
            load_balancing: LoadBalancingConfig::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Root configuration for the backend service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Application name reported in responses when the platform does not
    /// provide one.
    pub application_name: String,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            application_name: "backend".to_string(),
            listener: ListenerConfig {
                bind_address: "0.0.0.0:8081".to_string(),
            },
            observability: ObservabilityConfig {
                metrics_address: "0.0.0.0:9091".to_string(),
                ..ObservabilityConfig::default()
            },
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Logical endpoint of the peer (backend) service.
///
/// The host stays symbolic; the dispatcher resolves it per call when load
/// balancing is enabled, otherwise the connector resolves it on connect.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PeerConfig {
    /// Logical hostname of the backend (e.g., "backend.apps.internal").
    pub host: String,

    /// Backend port.
    pub port: u16,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8081,
        }
    }
}

/// Client-side load balancing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadBalancingConfig {
    /// Resolve the peer hostname on every call and rewrite the request
    /// target to one of the resolved addresses.
    pub enabled: bool,
}

impl Default for LoadBalancingConfig {
    fn default() -> Self {
        Self { enabled: false }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Number of most-recent outcomes considered while Closed. The breaker
    /// trips only when this many consecutive outcomes are all failures.
    pub window_size: usize,

    /// How long the breaker stays Open before allowing a probe, in ms.
    pub open_duration_ms: u64,
}

impl CircuitBreakerConfig {
    /// Open duration as a [`Duration`].
    pub fn open_duration(&self) -> Duration {
        Duration::from_millis(self.open_duration_ms)
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            window_size: 2,
            open_duration_ms: 1000,
        }
    }
}

/// Timeout configuration for the outbound call.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl TimeoutConfig {
    /// Connect timeout as a [`Duration`].
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    /// Request timeout as a [`Duration`].
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 2,
            request_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontend_defaults() {
        let config = FrontendConfig::default();
        assert_eq!(config.application_name, "frontend");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.peer.host, "localhost");
        assert_eq!(config.peer.port, 8081);
        assert!(!config.load_balancing.enabled);
        assert_eq!(config.circuit_breaker.window_size, 2);
        assert_eq!(
            config.circuit_breaker.open_duration(),
            Duration::from_millis(1000)
        );
    }

    #[test]
    fn backend_defaults() {
        let config = BackendConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8081");
        assert_eq!(config.application_name, "backend");
    }

    #[test]
    fn minimal_toml_fills_defaults() {
        let config: FrontendConfig = toml::from_str(
            r#"
            [peer]
            host = "backend.apps.internal"
            "#,
        )
        .unwrap();
        assert_eq!(config.peer.host, "backend.apps.internal");
        // Unspecified sections and fields fall back to defaults.
        assert_eq!(config.peer.port, 8081);
        assert_eq!(config.timeouts.request_secs, 5);
    }
}
