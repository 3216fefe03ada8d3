//! Liveness, readiness and metrics endpoints.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::metrics;

use super::AppState;

/// Liveness payload: the process is up.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: i64,
}

/// Readiness payload: the process can serve requests.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntoResponse for ReadinessResponse {
    fn into_response(self) -> Response {
        let status = if self.ready {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (status, Json(self)).into_response()
    }
}

/// `GET /health` — always healthy while the process runs.
pub async fn liveness() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().timestamp(),
    })
}

/// `GET /health/ready` — probes the database before reporting ready.
pub async fn readiness(State(state): State<AppState>) -> ReadinessResponse {
    match state.db.ping().await {
        Ok(()) => ReadinessResponse {
            ready: true,
            timestamp: Utc::now().timestamp(),
            error: None,
        },
        Err(e) => ReadinessResponse {
            ready: false,
            timestamp: Utc::now().timestamp(),
            error: Some(e.to_string()),
        },
    }
}

/// `GET /metrics` — Prometheus text exposition.
pub async fn metrics_text() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::gather_text(),
    )
}
