//! Outbound request dispatch.
//!
//! # Responsibilities
//! - Own the shared hyper client used for all peer calls
//! - Apply per-call DNS load balancing when enabled
//! - Enforce the connect and request deadlines
//!
//! # Design Decisions
//! - The authority is rewritten to the freshly resolved address; scheme,
//!   port, path and query survive the rewrite untouched
//! - Only requests targeting the configured peer host are rewritten,
//!   everything else passes through unchanged
//! - With balancing disabled the dispatcher is a plain client with a deadline

use std::str::FromStr;
use std::time::Duration;

use axum::body::Body;
use axum::http::uri::{Authority, Scheme};
use axum::http::{Request, Response, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

use crate::client::{resolver, CallError};
use crate::config::{LoadBalancingConfig, TimeoutConfig};

/// How the dispatcher picks the destination for each call.
#[derive(Debug, Clone)]
pub enum DispatchMode {
    /// Send to the URI exactly as the caller built it.
    Direct,
    /// Re-resolve `host` on every call and rewrite the URI authority to the
    /// resolved address.
    DnsBalanced { host: String },
}

/// Shared outbound HTTP client with optional per-call address selection.
pub struct Dispatcher {
    client: Client<HttpConnector, Body>,
    mode: DispatchMode,
    request_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        load_balancing: &LoadBalancingConfig,
        peer_host: &str,
        timeouts: &TimeoutConfig,
    ) -> Self {
        let mode = if load_balancing.enabled {
            DispatchMode::DnsBalanced {
                host: peer_host.to_string(),
            }
        } else {
            DispatchMode::Direct
        };
        Self::with_parts(mode, timeouts.connect(), timeouts.request())
    }

    fn with_parts(mode: DispatchMode, connect_timeout: Duration, request_timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self {
            client,
            mode,
            request_timeout,
        }
    }

    /// Send one request, applying address selection and the deadline.
    pub async fn dispatch(
        &self,
        request: Request<Body>,
    ) -> Result<Response<hyper::body::Incoming>, CallError> {
        let request = self.select_destination(request).await?;

        match tokio::time::timeout(self.request_timeout, self.client.request(request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(error)) => Err(CallError::Transport(error)),
            Err(_) => Err(CallError::Timeout(self.request_timeout)),
        }
    }

    /// Rewrite the request URI to a freshly resolved address when balancing
    /// is enabled and the URI targets the configured peer host.
    async fn select_destination(&self, request: Request<Body>) -> Result<Request<Body>, CallError> {
        let host = match &self.mode {
            DispatchMode::DnsBalanced { host } => host,
            DispatchMode::Direct => return Ok(request),
        };

        let uri_host = request.uri().host().unwrap_or_default();
        if !uri_host.eq_ignore_ascii_case(host) {
            return Ok(request);
        }
        let port = request.uri().port_u16().unwrap_or(80);

        let address = resolver::resolve_peer(host, port).await?;

        let (mut parts, body) = request.into_parts();
        let mut uri_parts = parts.uri.clone().into_parts();
        uri_parts.scheme = Some(Scheme::HTTP);
        let authority = Authority::from_str(&address.to_string())
            .map_err(|e| CallError::Protocol(format!("rewritten authority invalid: {e}")))?;
        uri_parts.authority = Some(authority);
        let uri = Uri::from_parts(uri_parts)
            .map_err(|e| CallError::Protocol(format!("rewritten uri invalid: {e}")))?;

        tracing::debug!(
            host = %host,
            address = %address,
            "Dispatching to resolved address"
        );

        parts.uri = uri;
        Ok(Request::from_parts(parts, body))
    }
}
