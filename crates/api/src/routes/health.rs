//! Liveness probe.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Body returned by the liveness probe.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process is serving requests.
    pub status: &'static str,
    /// Crate version baked in at compile time.
    pub version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Liveness route, mounted next to the cash-register routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
