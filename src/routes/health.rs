use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}

pub async fn health_check(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let start = Instant::now();
    let words = state.store().count_words();
    let latency_us = start.elapsed().as_micros() as u64;
    let healthy = words.is_ok();

    Json(serde_json::json!({
        "status": if healthy { "ok" } else { "degraded" },
        "uptimeSecs": state.uptime_secs(),
        "store": {
            "healthy": healthy,
            "words": words.unwrap_or(0),
            "latencyUs": latency_us,
        }
    }))
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// 存储可读才算就绪
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().count_words() {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness probe failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
