//! Address resolution for the backend peer.
//!
//! # Responsibilities
//! - Turn the configured peer host into one concrete socket address
//! - Do so freshly on every call, so DNS changes take effect immediately
//!
//! # Design Decisions
//! - No caching and no TTL handling, the platform resolver owns that
//! - The first returned address wins; rotation is left to the resolver

use std::net::SocketAddr;

use crate::client::CallError;

/// Resolve `host:port` and pick one address for this call.
pub async fn resolve_peer(host: &str, port: u16) -> Result<SocketAddr, CallError> {
    let addresses: Vec<SocketAddr> = tokio::net::lookup_host((host, port))
        .await
        .map_err(|source| CallError::Resolution {
            host: host.to_string(),
            source,
        })?
        .collect();

    let chosen = *addresses.first().ok_or_else(|| CallError::Resolution {
        host: host.to_string(),
        source: std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "resolver returned no addresses",
        ),
    })?;

    tracing::debug!(
        host = %host,
        candidates = addresses.len(),
        address = %chosen,
        "Resolved peer address"
    );

    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_an_ip_literal_verbatim() {
        let addr = resolve_peer("127.0.0.1", 8081).await.unwrap();
        assert_eq!(addr, "127.0.0.1:8081".parse().unwrap());
    }

    #[tokio::test]
    async fn resolves_localhost_to_a_loopback_address() {
        let addr = resolve_peer("localhost", 9000).await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 9000);
    }

    #[tokio::test]
    async fn unresolvable_host_is_a_resolution_error() {
        let err = resolve_peer("no-such-host.invalid", 8081)
            .await
            .unwrap_err();
        assert_eq!(err.label(), "resolution");
        assert!(err.to_string().contains("no-such-host.invalid"));
    }
}
