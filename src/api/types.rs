//! API response types.

use serde::Serialize;

/// Liveness banner for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process serves requests.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Crate version.
    pub version: &'static str,
}

impl HealthResponse {
    pub fn current() -> Self {
        Self {
            status: "healthy",
            service: "Microgrid Simulator",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Error response body for 4xx/5xx results.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
