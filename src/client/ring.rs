//! The resilient ring call.
//!
//! # Responsibilities
//! - Build the `GET /ring?visitor=...` request against the configured peer
//! - Gate every attempt through the circuit breaker
//! - Turn every failure into the fallback message
//!
//! # Design Decisions
//! - `ring` returns a `String`, never an error; callers always have
//!   something to render
//! - Non-2xx answers and malformed bodies are protocol failures, the
//!   breaker treats them like a dead peer
//! - A permitted call that is dropped mid-flight still reports an outcome;
//!   the breaker never waits on a caller that went away

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{header, Method, Request};
use serde::Deserialize;
use url::Url;

use crate::client::dispatch::Dispatcher;
use crate::client::CallError;
use crate::config::FrontendConfig;
use crate::observability::metrics;
use crate::resilience::{CallOutcome, CircuitBreaker};

/// Served in place of a backend answer whenever the call cannot deliver one.
pub const FALLBACK_MESSAGE: &str = "No backend service available";

/// Response bodies larger than this are treated as protocol failures.
const MAX_RESPONSE_BYTES: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
struct RingReply {
    message: String,
}

/// Client for the backend ring endpoint, wrapped in a circuit breaker and a
/// fallback.
pub struct RingClient {
    dispatcher: Dispatcher,
    breaker: Arc<CircuitBreaker>,
    peer_url: Url,
}

/// Delivers the outcome of one permitted call to the breaker exactly once.
///
/// Dropping the guard before `record` counts the call as a failure: a
/// `ring` future cancelled mid-call still releases a claimed half-open
/// slot.
struct OutcomeGuard<'a> {
    breaker: &'a CircuitBreaker,
    start: Instant,
    recorded: bool,
}

impl<'a> OutcomeGuard<'a> {
    fn new(breaker: &'a CircuitBreaker, start: Instant) -> Self {
        Self {
            breaker,
            start,
            recorded: false,
        }
    }

    fn record(mut self, outcome: CallOutcome) {
        self.recorded = true;
        self.breaker.record(outcome);
    }
}

impl Drop for OutcomeGuard<'_> {
    fn drop(&mut self) {
        if self.recorded {
            return;
        }
        tracing::debug!("Ring call dropped before completion");
        self.breaker.record(CallOutcome::Failure("cancelled"));
        metrics::record_ring_call("cancelled", self.start);
    }
}

impl RingClient {
    /// `breaker` is shared: the caller keeps a handle for introspection,
    /// every call records into it here.
    pub fn new(
        config: &FrontendConfig,
        breaker: Arc<CircuitBreaker>,
    ) -> Result<Self, url::ParseError> {
        let peer_url = Url::parse(&format!(
            "http://{}:{}/ring",
            config.peer.host, config.peer.port
        ))?;
        Ok(Self {
            dispatcher: Dispatcher::new(
                &config.load_balancing,
                &config.peer.host,
                &config.timeouts,
            ),
            breaker,
            peer_url,
        })
    }

    /// Ring the backend doorbell on behalf of `visitor`.
    ///
    /// Never fails: when the breaker denies the attempt or the call errors,
    /// the fallback message is returned instead of the backend's answer.
    pub async fn ring(&self, visitor: &str) -> String {
        let start = Instant::now();

        if !self.breaker.permit() {
            tracing::info!(visitor = %visitor, "Ring call short-circuited");
            metrics::record_ring_call("short_circuited", start);
            return FALLBACK_MESSAGE.to_string();
        }

        let guard = OutcomeGuard::new(&self.breaker, start);
        match self.call(visitor).await {
            Ok(message) => {
                guard.record(CallOutcome::Success);
                metrics::record_ring_call("success", start);
                message
            }
            Err(error) => {
                let label = error.label();
                tracing::warn!(visitor = %visitor, error = %error, "Ring call failed");
                guard.record(CallOutcome::Failure(label));
                metrics::record_ring_call(label, start);
                FALLBACK_MESSAGE.to_string()
            }
        }
    }

    async fn call(&self, visitor: &str) -> Result<String, CallError> {
        let mut url = self.peer_url.clone();
        url.query_pairs_mut().append_pair("visitor", visitor);

        let request = Request::builder()
            .method(Method::GET)
            .uri(url.as_str())
            .header(
                header::USER_AGENT,
                concat!("c2c-doorbell/", env!("CARGO_PKG_VERSION")),
            )
            .body(Body::empty())
            .map_err(|e| CallError::Protocol(format!("failed to build request: {e}")))?;

        let response = self.dispatcher.dispatch(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CallError::Protocol(format!("backend answered {status}")));
        }

        let body = axum::body::to_bytes(Body::new(response.into_body()), MAX_RESPONSE_BYTES)
            .await
            .map_err(|e| CallError::Protocol(format!("failed to read response body: {e}")))?;

        let reply: RingReply = serde_json::from_slice(&body)
            .map_err(|e| CallError::Protocol(format!("malformed response body: {e}")))?;

        Ok(reply.message)
    }
}
