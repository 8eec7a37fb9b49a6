//! Frontend HTTP surface.
//!
//! # Responsibilities
//! - Serve the doorbell page (`GET /`) backed by the resilient ring call
//! - Expose breaker introspection (`GET /status`)
//! - Wire middleware (timeout, tracing, request id)
//!
//! # Design Decisions
//! - The page is plain text; every visit rings the backend once with the
//!   frontend's own instance identity as the visitor
//! - The page always renders, fallback included, with the time spent

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::client::RingClient;
use crate::config::FrontendConfig;
use crate::http::request;
use crate::instance::InstanceInfo;
use crate::observability::metrics;
use crate::resilience::CircuitBreaker;

/// Application state injected into frontend handlers.
#[derive(Clone)]
pub struct FrontendState {
    pub ring: Arc<RingClient>,
    /// The same breaker instance the ring client records into.
    pub breaker: Arc<CircuitBreaker>,
    pub instance: Arc<InstanceInfo>,
    /// Peer endpoint as "host:port", for the page and the status endpoint.
    pub peer: String,
}

/// Build the frontend router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &FrontendConfig, state: FrontendState) -> Router {
    // Inbound deadline sits above the outbound one so the fallback can
    // still render when the backend call times out.
    let inbound_timeout = config.timeouts.request() + Duration::from_secs(1);

    Router::new()
        .route("/", get(ring_doorbell))
        .route("/status", get(status))
        .with_state(state)
        .layer(TimeoutLayer::new(inbound_timeout))
        .layer(request::propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request::set_request_id_layer())
}

/// Doorbell page: ring the backend and report what happened.
async fn ring_doorbell(State(state): State<FrontendState>) -> String {
    let start = Instant::now();

    let mut page = String::new();
    page.push_str("Welcome to the Container-to-Container Doorbell Demo\n");
    page.push_str(&format!("Frontend instance: {}\n", state.instance));
    page.push_str(&format!("Connecting to backend: {}\n", state.peer));

    let message = state.ring.ring(&state.instance.to_string()).await;
    tracing::info!(message = %message, "Relaying backend message");

    // Continuation lines of the message are indented under the header.
    let indented = message.replace('\n', "\n  ");
    page.push_str(&format!("Received message from backend:\n  {indented}\n"));
    page.push_str(&format!("Time spent: {} ms\n", start.elapsed().as_millis()));

    metrics::record_http_request("frontend", 200, start);
    page
}

#[derive(Serialize)]
struct StatusResponse {
    version: &'static str,
    breaker: &'static str,
    peer: String,
}

/// Introspection endpoint for operators and tests.
async fn status(State(state): State<FrontendState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        breaker: state.breaker.state().as_str(),
        peer: state.peer.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use std::collections::HashMap;

    fn state_for(port: u16) -> FrontendState {
        let mut config = FrontendConfig::default();
        config.peer.host = "127.0.0.1".to_string();
        config.peer.port = port;
        let breaker = Arc::new(CircuitBreaker::new(&config.circuit_breaker));
        FrontendState {
            ring: Arc::new(RingClient::new(&config, breaker.clone()).unwrap()),
            breaker,
            instance: Arc::new(InstanceInfo {
                application: "frontend".to_string(),
                index: 0,
            }),
            peer: format!("{}:{}", config.peer.host, config.peer.port),
        }
    }

    #[tokio::test]
    async fn page_renders_the_backend_message_indented() {
        async fn greet(Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
            let visitor = params.get("visitor").cloned().unwrap_or_default();
            Json(serde_json::json!({
                "message": format!("backend/0 says:\nThank you for coming, {visitor}!")
            }))
        }
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let app = Router::new().route("/ring", get(greet));
            axum::serve(listener, app).await.unwrap();
        });

        let page = ring_doorbell(State(state_for(port))).await;

        assert!(page.contains("Frontend instance: frontend/0"));
        assert!(page.contains(&format!("Connecting to backend: 127.0.0.1:{port}")));
        assert!(page.contains(
            "Received message from backend:\n  backend/0 says:\n  Thank you for coming, frontend/0!"
        ));
        assert!(page.contains("Time spent: "));
    }

    #[tokio::test]
    async fn page_renders_the_fallback_when_the_peer_is_down() {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let page = ring_doorbell(State(state_for(port))).await;

        assert!(page.contains("Received message from backend:\n  No backend service available\n"));
        assert!(page.contains("Time spent: "));
    }

    #[tokio::test]
    async fn status_reports_version_and_breaker_state() {
        let response = status(State(state_for(1))).await;
        assert_eq!(response.0.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(response.0.breaker, "closed");
        assert_eq!(response.0.peer, "127.0.0.1:1");
    }

    #[tokio::test]
    async fn status_sees_failures_recorded_by_the_ring_client() {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let state = state_for(port);
        state.ring.ring("frontend/0").await;
        state.ring.ring("frontend/0").await;

        let response = status(State(state)).await;
        assert_eq!(response.0.breaker, "open");
    }
}
