use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xgen_api::config::ServerConfig;
use xgen_api::router::build_app_router;
use xgen_api::state::AppState;
use xgen_core::prompts::TemplatePromptSource;
use xgen_imagen::token::{self, TokenProvider};
use xgen_imagen::VertexImagenProvider;

/// How long shutdown waits for cancelled runs to wind down.
const RUN_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "xgen_api=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        static_dir = %config.static_dir.display(),
        on_disconnect = ?config.on_disconnect,
        "Loaded server configuration"
    );
    if config.imagen.project_id.is_empty() {
        tracing::warn!("GOOGLE_CLOUD_PROJECT is not set; every image request will fail");
    }

    // --- Image provider ---
    let tokens = token::from_config(&config.imagen, reqwest::Client::new())
        .expect("Failed to load Google Cloud credentials");
    check_credentials(tokens.as_ref()).await;
    let provider = Arc::new(VertexImagenProvider::new(config.imagen.clone(), tokens));
    tracing::info!(model = %config.imagen.model, location = %config.imagen.location, "Imagen provider ready");

    // --- App state ---
    let state = AppState::new(config.clone(), provider, Arc::new(TemplatePromptSource::new()));
    let runs = state.runs.clone();

    // --- Router ---
    let app = build_app_router(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // Open event streams only end when their run does, so runs are
    // cancelled as soon as the signal arrives.
    let signal_runs = runs.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            signal_runs.cancel_all();
        })
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    runs.shutdown(RUN_DRAIN_TIMEOUT).await;
    tracing::info!("Graceful shutdown complete");
}

/// Fetch one token up front so missing credentials show up in the log at
/// startup rather than on the first image.
async fn check_credentials(tokens: &dyn TokenProvider) {
    match tokens.access_token().await {
        Ok(_) => tracing::info!(provider = tokens.name(), "Google Cloud credentials available"),
        Err(e) => tracing::warn!(
            provider = tokens.name(),
            error = %e,
            "Google Cloud credentials unavailable; image requests will fail until this is fixed"
        ),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
