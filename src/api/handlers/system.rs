use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::api::{state::AppState, types::MessageResponse};
use crate::services::{HealthResponse, HealthStatus};

/// GET /
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Disease prediction backend is running.".to_string(),
    })
}

/// GET /health -- component summary
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let health = HealthResponse::from_context(&state.ctx);
    let status_code = match health.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(health))
}

/// GET /healthz -- is the process alive?
pub async fn liveness() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /readyz -- can the service answer predictions?
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if state.ctx.status().is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /metrics -- Prometheus text format
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = state
        .metrics
        .prometheus(state.ctx.status().is_ready(), state.uptime_seconds());
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; charset=utf-8",
        )],
        body,
    )
}
