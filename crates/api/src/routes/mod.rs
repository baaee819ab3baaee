pub mod generate;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the route tree.
///
/// ```text
/// /generate        start a run, stream progress (SSE)
/// /status          server status and active run count
/// /health          liveness
/// /favicon.ico     204
/// ```
///
/// Anything else falls through to static files (see [`crate::router`]).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/generate", get(generate::generate))
        .route("/status", get(health::status))
        .route("/health", get(health::health_check))
        .route("/favicon.ico", get(health::favicon))
}
