//! Health check endpoint
//!
//! `GET /healthz` - liveness check. Returns 200 while the process is serving.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::routes::json_response;
use crate::server::AppState;

/// Health response
#[derive(Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    /// Storage backend in use ("mongo" or "memory")
    pub store: &'static str,
    pub version: &'static str,
    /// Uptime in seconds
    pub uptime: u64,
}

/// GET /healthz
pub fn health_check(state: &AppState) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &HealthResponse {
            healthy: true,
            store: state.resolver.store().backend(),
            version: env!("CARGO_PKG_VERSION"),
            uptime: state.started_at.elapsed().as_secs(),
        },
    )
}
