//! Configuration loading from disk and environment.
//!
//! Precedence, lowest to highest: built-in defaults, TOML file, environment
//! variables. The env layer mirrors what the platform injects into each
//! container (`PORT` for the listener, `BACKEND_HOST`/`BACKEND_PORT` for the
//! peer), so the same image runs unmodified on and off the platform.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use crate::config::schema::{BackendConfig, FrontendConfig};
use crate::config::validation::{validate_backend, validate_frontend, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load, override and validate the frontend configuration.
///
/// With no file path, the built-in defaults are the base layer.
pub fn load_frontend_config(path: Option<&Path>) -> Result<FrontendConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_file(path)?,
        None => FrontendConfig::default(),
    };
    apply_frontend_overrides(&mut config, |key| std::env::var(key).ok());
    validate_frontend(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load, override and validate the backend configuration.
pub fn load_backend_config(path: Option<&Path>) -> Result<BackendConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_file(path)?,
        None => BackendConfig::default(),
    };
    apply_backend_overrides(&mut config, |key| std::env::var(key).ok());
    validate_backend(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn parse_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

fn apply_frontend_overrides<F>(config: &mut FrontendConfig, get: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = get("PORT").and_then(|v| v.parse::<u16>().ok()) {
        config.listener.bind_address = rebind_port(&config.listener.bind_address, port);
    }
    if let Some(host) = get("BACKEND_HOST") {
        config.peer.host = host;
    }
    if let Some(port) = get("BACKEND_PORT").and_then(|v| v.parse::<u16>().ok()) {
        config.peer.port = port;
    }
}

fn apply_backend_overrides<F>(config: &mut BackendConfig, get: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = get("PORT").and_then(|v| v.parse::<u16>().ok()) {
        config.listener.bind_address = rebind_port(&config.listener.bind_address, port);
    }
}

/// Swap the port of a `host:port` bind address, leaving an unparseable
/// address untouched for validation to report.
fn rebind_port(bind_address: &str, port: u16) -> String {
    match bind_address.parse::<SocketAddr>() {
        Ok(mut addr) => {
            addr.set_port(port);
            addr.to_string()
        }
        Err(_) => bind_address.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn env_overrides_peer_and_port() {
        let mut config = FrontendConfig::default();
        apply_frontend_overrides(
            &mut config,
            env_of(&[
                ("PORT", "9000"),
                ("BACKEND_HOST", "backend.apps.internal"),
                ("BACKEND_PORT", "8082"),
            ]),
        );
        assert_eq!(config.listener.bind_address, "0.0.0.0:9000");
        assert_eq!(config.peer.host, "backend.apps.internal");
        assert_eq!(config.peer.port, 8082);
    }

    #[test]
    fn unparseable_env_values_are_ignored() {
        let mut config = FrontendConfig::default();
        apply_frontend_overrides(
            &mut config,
            env_of(&[("PORT", "not-a-port"), ("BACKEND_PORT", "99999999")]),
        );
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.peer.port, 8081);
    }

    #[test]
    fn backend_port_override() {
        let mut config = BackendConfig::default();
        apply_backend_overrides(&mut config, env_of(&[("PORT", "9001")]));
        assert_eq!(config.listener.bind_address, "0.0.0.0:9001");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_backend_config(Some(Path::new("/nonexistent/demo.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = std::env::temp_dir();
        let path = dir.join("c2c-doorbell-bad-config.toml");
        fs::write(&path, "peer = 12").unwrap();
        let err = load_frontend_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let _ = fs::remove_file(&path);
    }
}
