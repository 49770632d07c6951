//! Health check handlers for service monitoring.
//!
//! Provides liveness and readiness endpoints with a store connectivity
//! check for orchestration systems like Kubernetes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, instrument};

use crate::AppState;

/// Readiness check response structure.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service health status
    pub status: HealthStatus,
    /// Timestamp when health check was performed
    pub timestamp: DateTime<Utc>,
    /// Individual component health checks
    pub checks: HealthChecks,
    /// Service version information
    pub version: String,
}

/// Overall health status enumeration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    Healthy,
    /// Critical systems failing
    Unhealthy,
}

/// Individual component health check results.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    /// Event store connectivity check
    pub store: ComponentHealth,
}

/// Health status for individual components.
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    /// Component status
    pub status: ComponentStatus,
    /// Optional error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Component-level health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Component is healthy
    Up,
    /// Component is experiencing issues
    Down,
}

/// Liveness check endpoint.
///
/// Returns a simple response indicating the service process is alive.
/// Doesn't test external dependencies, focusing only on whether the
/// HTTP server is responding.
#[instrument(name = "liveness_check")]
pub async fn liveness_check() -> Response {
    let response = serde_json::json!({
        "status": "alive",
        "timestamp": Utc::now(),
        "service": "nestbox-api"
    });

    (StatusCode::OK, Json(response)).into_response()
}

/// Readiness check endpoint.
///
/// Verifies the event store answers a lightweight probe before the
/// service accepts traffic. Designed to be called frequently by
/// orchestration systems, so it avoids expensive operations.
#[instrument(name = "readiness_check", skip(state))]
pub async fn readiness_check(State(state): State<AppState>) -> Response {
    debug!("Performing readiness check");

    let store = match state.store.health_check().await {
        Ok(()) => {
            debug!("Store health check passed");
            ComponentHealth { status: ComponentStatus::Up, message: None }
        },
        Err(e) => {
            error!("Store health check failed: {}", e);
            ComponentHealth {
                status: ComponentStatus::Down,
                message: Some(format!("Store connection failed: {e}")),
            }
        },
    };

    let (status, status_code) = match store.status {
        ComponentStatus::Up => (HealthStatus::Healthy, StatusCode::OK),
        ComponentStatus::Down => (HealthStatus::Unhealthy, StatusCode::SERVICE_UNAVAILABLE),
    };

    let response = HealthResponse {
        status,
        timestamp: Utc::now(),
        checks: HealthChecks { store },
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (status_code, Json(response)).into_response()
}
