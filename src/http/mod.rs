//! HTTP surfaces for the two services.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → request.rs (assign x-request-id, echo it on the response)
//!     → frontend.rs  GET /        (doorbell page via the ring client)
//!       frontend.rs  GET /status  (breaker introspection)
//!       backend.rs   GET /ring    (doorbell endpoint, visitor counter)
//!     → Send response
//! ```

pub mod backend;
pub mod frontend;
pub mod request;

pub use backend::BackendState;
pub use frontend::FrontendState;

use tokio::net::TcpListener;

use crate::lifecycle::Shutdown;

/// Serve `router` on `listener` until shutdown is triggered, draining
/// in-flight requests before returning.
pub async fn serve(
    service: &'static str,
    listener: TcpListener,
    router: axum::Router,
    shutdown: Shutdown,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(service = %service, address = %addr, "HTTP server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.recv().await })
        .await?;

    tracing::info!(service = %service, "HTTP server stopped");
    Ok(())
}
