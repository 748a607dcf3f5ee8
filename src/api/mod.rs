//! REST API exposing the dispatch engine to presentation clients.
//!
//! Provides two endpoints:
//! - `POST /simulate` — run a 24-hour simulation for a scenario payload
//! - `GET /health` — service liveness banner

mod handlers;
mod types;

use std::net::SocketAddr;

use axum::Router;
use axum::routing::{get, post};

/// Builds the axum router with all API routes.
///
/// Handlers are stateless: every request validates its own scenario and runs
/// its own engine, so concurrent simulations never share mutable state.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/simulate", post(handlers::post_simulate))
}

/// Binds to the given address and serves the API.
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(addr: SocketAddr) {
    let app = router();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
