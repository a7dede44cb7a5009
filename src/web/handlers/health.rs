//! # Health Check Handlers
//!
//! Liveness and readiness probes for load balancers and orchestrators.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::{debug, error};

use crate::constants::system::SERVICE_NAME;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub store: String,
    pub assistant_enabled: bool,
    pub timestamp: String,
}

/// Basic health check: GET /health
pub async fn basic_health(_state: State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Readiness probe: GET /health/ready
///
/// Pings the store; 503 when it cannot be reached.
pub async fn readiness_probe(State(state): State<AppState>) -> ApiResult<Json<ReadinessResponse>> {
    debug!("Performing readiness probe");
    let store = state.service.store();

    if let Err(e) = store.ping().await {
        error!(backend = store.backend(), error = %e, "Readiness check failed");
        return Err(ApiError::ServiceUnavailable {
            message: format!("{} store is not reachable", store.backend()),
        });
    }

    Ok(Json(ReadinessResponse {
        status: "ready".to_string(),
        store: store.backend().to_string(),
        assistant_enabled: state.assistant.is_enabled(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}
