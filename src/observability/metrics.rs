//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Expose a Prometheus-compatible metrics endpoint
//! - Record ring call outcomes, breaker transitions and served requests
//!
//! # Metrics
//! - `doorbell_ring_calls_total` (counter): outbound calls by outcome
//! - `doorbell_ring_call_duration_seconds` (histogram): outbound latency
//! - `doorbell_breaker_transitions_total` (counter): state changes by from/to
//! - `doorbell_http_requests_total` (counter): served requests by service, status
//! - `doorbell_http_request_duration_seconds` (histogram): handler latency
//!
//! # Design Decisions
//! - Recording with no exporter installed is a no-op, so library code can
//!   emit metrics unconditionally
//! - The exporter runs its own listener; a failure to start is logged and
//!   the process keeps serving traffic

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resilience::CircuitState;

/// Start the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(error) => {
            tracing::error!(%error, "Failed to start metrics exporter");
        }
    }
}

/// One outbound ring call finished (or was short-circuited).
pub fn record_ring_call(outcome: &'static str, start: Instant) {
    counter!("doorbell_ring_calls_total", "outcome" => outcome).increment(1);
    histogram!("doorbell_ring_call_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_breaker_transition(from: CircuitState, to: CircuitState) {
    counter!(
        "doorbell_breaker_transitions_total",
        "from" => from.as_str(),
        "to" => to.as_str()
    )
    .increment(1);
}

/// One inbound request served by a frontend or backend handler.
pub fn record_http_request(service: &'static str, status: u16, start: Instant) {
    counter!(
        "doorbell_http_requests_total",
        "service" => service,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("doorbell_http_request_duration_seconds", "service" => service)
        .record(start.elapsed().as_secs_f64());
}
