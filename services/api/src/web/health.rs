//! services/api/src/web/health.rs
//!
//! Liveness and readiness probes.

use crate::web::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct LivenessResponse {
    alive: bool,
}

#[derive(Serialize, ToSchema)]
pub struct ReadinessChecks {
    database: bool,
    openai: bool,
}

#[derive(Serialize, ToSchema)]
pub struct ReadinessResponse {
    ready: bool,
    checks: ReadinessChecks,
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    })
}

#[utoipa::path(
    get,
    path = "/health/live",
    responses((status = 200, description = "Process is alive", body = LivenessResponse))
)]
pub async fn liveness_handler() -> impl IntoResponse {
    Json(LivenessResponse { alive: true })
}

/// Ready once the database answers and a provider key is configured.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Ready to serve", body = ReadinessResponse),
        (status = 503, description = "A dependency is unavailable", body = ReadinessResponse)
    )
)]
pub async fn readiness_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match app_state.db.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!("Readiness check: database unavailable: {}", e);
            false
        }
    };
    let openai = app_state.config.openai_api_key.is_some();
    let ready = database && openai;
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            ready,
            checks: ReadinessChecks { database, openai },
        }),
    )
}
