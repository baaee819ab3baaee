#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tokio::sync::Semaphore;
use tower::ServiceExt;
use xgen_api::config::ServerConfig;
use xgen_api::router::build_app_router;
use xgen_api::state::AppState;
use xgen_core::category::AspectRatio;
use xgen_core::prompts::TemplatePromptSource;
use xgen_imagen::{ImageOutcome, ImageProvider};
use xgen_pipeline::{OutputDirs, PacingConfig};

/// Provider that returns fixed bytes, optionally waiting for a permit per
/// image so tests can hold a run in flight.
pub struct FakeProvider {
    gate: Option<Semaphore>,
}

impl FakeProvider {
    pub fn instant() -> Self {
        Self { gate: None }
    }

    /// Every image blocks until [`release`](Self::release) hands out a permit.
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
        }
    }

    pub fn release(&self, images: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(images);
        }
    }
}

#[async_trait]
impl ImageProvider for FakeProvider {
    async fn generate(&self, _prompt: &str, _aspect_ratio: AspectRatio) -> ImageOutcome {
        if let Some(gate) = &self.gate {
            match gate.acquire().await {
                Ok(permit) => permit.forget(),
                Err(_) => return ImageOutcome::failed("gate closed"),
            }
        }
        ImageOutcome::generated(b"fake-png".to_vec())
    }
}

/// Configuration rooted in `root`, without pacing delays.
pub fn test_config(root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        static_dir: root.join("static"),
        output: OutputDirs::under(root.join("generated")),
        pacing: PacingConfig::unpaced(5),
        ..ServerConfig::default()
    }
}

/// Build the full application router, returning the state so tests can
/// inspect the run registry.
pub fn build_test_app(config: ServerConfig, provider: Arc<FakeProvider>) -> (Router, AppState) {
    let state = AppState::new(config, provider, Arc::new(TemplatePromptSource::seeded(7)));
    (build_app_router(state.clone()), state)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Read the whole body. For `/generate` this waits for the run to end.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// Poll until no run is registered, failing after a few seconds.
pub async fn wait_for_idle(state: &AppState) {
    for _ in 0..200 {
        if state.runs.active_runs() == 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("generation run did not finish");
}
