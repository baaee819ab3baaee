use std::sync::Arc;

use xgen_core::prompts::PromptSource;
use xgen_imagen::ImageProvider;

use crate::config::ServerConfig;
use crate::runs::RunRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Image backend shared by every run.
    pub provider: Arc<dyn ImageProvider>,
    pub prompts: Arc<dyn PromptSource>,
    /// Runs currently in flight.
    pub runs: RunRegistry,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        provider: Arc<dyn ImageProvider>,
        prompts: Arc<dyn PromptSource>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            provider,
            prompts,
            runs: RunRegistry::new(),
        }
    }
}
