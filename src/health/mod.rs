//! Liveness and readiness endpoints.
//!
//! Both live outside the route table and never forward traffic.

use axum::Json;
use serde::Serialize;

/// Body of the health endpoints.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: &'static str,
}

impl HealthStatus {
    const OK: Self = Self { status: "ok" };
}

/// `GET /health`: the process is up.
pub async fn liveness() -> Json<HealthStatus> {
    Json(HealthStatus::OK)
}

/// `GET /ready`: the proxy accepts traffic. Configuration is validated
/// before the listener binds, so a serving process is always ready.
pub async fn readiness() -> Json<HealthStatus> {
    Json(HealthStatus::OK)
}
