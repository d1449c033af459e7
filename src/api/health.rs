//! Health check endpoints for container probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::state::AppState;

/// Detailed health response with component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Health check status
#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Simple health check - returns 200 if the service is running
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check - verifies the climate store answers queries
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let store_check = check_climate_store(&state).await;
    let overall_status = store_check.status;

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(vec![store_check]),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness check - simple check to verify the service is running
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn check_climate_store(state: &AppState) -> HealthCheck {
    let start = Instant::now();

    let (status, message) = match state.climate_service.ping().await {
        Ok(()) => (HealthStatus::Healthy, None),
        Err(e) => (HealthStatus::Unhealthy, Some(e.to_string())),
    };

    HealthCheck {
        name: "climate_store".to_string(),
        status,
        message,
        latency_ms: Some(start.elapsed().as_millis() as u64),
    }
}
