//! Liveness probe.

use axum::Json;
use serde::Serialize;

use crate::config;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// `GET /` — constant liveness acknowledgment.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "running",
        service: config::SERVICE_NAME,
        version: config::APP_VERSION,
    })
}
