use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use crate::api::{state::AppState, types::*};

/// GET /health -- full status, always 200 so a degraded start stays observable
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let predictor = &state.predictor;
    let status = if predictor.is_ready() {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    Json(HealthResponse {
        status,
        timestamp: Utc::now(),
        uptime_seconds: state.uptime_seconds(),
        model_loaded: predictor.model_loaded(),
        labels_loaded: predictor.labels_loaded(),
        label_count: predictor.labels().len(),
    })
}

/// Liveness check - is the process alive?
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness check - can /predict answer with a prediction?
pub async fn readiness_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.predictor.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Prometheus metrics endpoint
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let body = state.metrics.render(state.gauges());
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; charset=utf-8",
        )],
        body,
    )
}
