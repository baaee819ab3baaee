use std::path::PathBuf;

use xgen_core::CoreError;

/// Orchestration failures. Any of these aborts the run; per-image failures
/// never surface here.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report {}: {source}", path.display())]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Prompt generation failed: {0}")]
    Prompt(#[source] CoreError),

    #[error("Invalid generation plan: {0}")]
    InvalidPlan(#[source] CoreError),

    #[error("Generation cancelled")]
    Cancelled,
}
