//! Request identity.
//!
//! # Responsibilities
//! - Stamp every inbound request with a unique id (UUID v4)
//! - Echo the id back on the response so callers can correlate
//!
//! # Design Decisions
//! - An id supplied by the caller is kept, never replaced
//! - The id lives in the `x-request-id` header, nowhere else

use axum::http::Request;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

/// `MakeRequestId` backed by UUID v4.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Layer that assigns `x-request-id` to requests missing one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeUuidRequestId> {
    SetRequestIdLayer::x_request_id(MakeUuidRequestId)
}

/// Layer that copies `x-request-id` from the request onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}
