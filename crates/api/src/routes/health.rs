//! Liveness and service-status endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
pub struct StatusResponse {
    status: &'static str,
    active_runs: usize,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// The server is up; also reports how many runs are in flight.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running",
        active_runs: state.runs.active_runs(),
    })
}

/// Browsers ask for it on every page load; there is none.
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}
