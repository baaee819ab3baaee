//! Shared application router builder.
//!
//! Provides [`build_app_router`] so both the production binary (`main.rs`)
//! and integration tests (`tests/common/mod.rs`) use the exact same
//! middleware stack.

use axum::extract::Request;
use axum::http::{HeaderName, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::routes;
use crate::state::AppState;

/// Build the full application [`Router`] with all middleware layers.
///
/// The middleware stack is applied bottom-up:
///
/// 1. CORS
/// 2. Set request ID on incoming requests
/// 3. Structured request/response tracing
/// 4. Propagate request ID to response
/// 5. Panic recovery (catch panics, return 500)
/// 6. Refuse hidden files and credential-like files
///
/// There is no request timeout: `/generate` responses stay open for the
/// whole run.
pub fn build_app_router(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .merge(routes::api_routes())
        .fallback_service(static_files)
        // -- Middleware stack (applied bottom-up) --
        .layer(middleware::from_fn(refuse_private_files))
        .layer(CatchPanicLayer::new())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(build_cors_layer())
        .with_state(state)
}

/// Any origin may read the event stream; only `GET` is exposed.
pub fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any)
}

/// Return 404 for dotfiles (`.env`, `.git/...`) and key material so a
/// static directory shared with credentials never leaks them.
async fn refuse_private_files(request: Request, next: Next) -> Response {
    if is_private_path(request.uri().path()) {
        tracing::warn!(path = %request.uri().path(), "Refused request for a private file");
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

fn is_private_path(path: &str) -> bool {
    path.split('/').any(|segment| {
        let segment = segment.to_ascii_lowercase();
        segment.starts_with('.')
            || segment.starts_with("%2e")
            || PRIVATE_EXTENSIONS.iter().any(|ext| segment.ends_with(ext))
    })
}

const PRIVATE_EXTENSIONS: [&str; 3] = [".json", ".pem", ".key"];
