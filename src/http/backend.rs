//! Backend HTTP surface.
//!
//! # Responsibilities
//! - Answer the doorbell (`GET /ring?visitor=...`)
//! - Keep the process-wide visitor count
//!
//! # Design Decisions
//! - The visitor parameter is required; an empty or missing value is a 400
//! - The count lives in one atomic, shared by all handler invocations

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::http::request;
use crate::instance::InstanceInfo;
use crate::observability::metrics;

/// Inbound request deadline. The handler does no I/O, so this only guards
/// against stuck connections.
const INBOUND_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into backend handlers.
#[derive(Clone)]
pub struct BackendState {
    pub instance: Arc<InstanceInfo>,
    pub visitors: Arc<AtomicU64>,
}

impl BackendState {
    pub fn new(instance: InstanceInfo) -> Self {
        Self {
            instance: Arc::new(instance),
            visitors: Arc::new(AtomicU64::new(0)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RingParams {
    #[serde(default)]
    visitor: String,
}

#[derive(Debug, Serialize)]
struct RingResponse {
    message: String,
}

/// Build the backend router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: BackendState) -> Router {
    Router::new()
        .route("/ring", get(ring))
        .with_state(state)
        .layer(TimeoutLayer::new(INBOUND_TIMEOUT))
        .layer(request::propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request::set_request_id_layer())
}

/// Doorbell endpoint.
async fn ring(
    State(state): State<BackendState>,
    Query(params): Query<RingParams>,
) -> Result<Json<RingResponse>, StatusCode> {
    let start = Instant::now();

    if params.visitor.is_empty() {
        metrics::record_http_request("backend", 400, start);
        return Err(StatusCode::BAD_REQUEST);
    }

    tracing::info!(visitor = %params.visitor, "Someone is at the door");
    let count = state.visitors.fetch_add(1, Ordering::Relaxed) + 1;

    let message = format!(
        "{} says:\nThank you for coming, {}!\nVisitor count: {}",
        state.instance, params.visitor, count
    );

    metrics::record_http_request("backend", 200, start);
    Ok(Json(RingResponse { message }))
}
