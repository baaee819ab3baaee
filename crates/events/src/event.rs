//! The progress event union.

use serde::{Deserialize, Serialize};
use xgen_core::report::format_rate;
use xgen_core::types::ImageId;
use xgen_core::{ImageCategory, RunStatistics};

/// Something that happened during a run.
///
/// Serialized with a `"type"` discriminator (`status`, `progress`,
/// `complete`, `error`), which is what the browser client switches on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressEvent {
    /// Free-form status line, e.g. "Generating header image 3...".
    Status { message: String },

    /// Outcome of one image.
    #[serde(rename_all = "camelCase")]
    Progress {
        image_id: ImageId,
        image_type: ImageCategory,
        success: bool,
        error: Option<String>,
    },

    /// The run finished.
    Complete { summary: CompletionSummary },

    /// The run aborted.
    Error { message: String },
}

impl ProgressEvent {
    pub fn status(message: impl Into<String>) -> Self {
        ProgressEvent::Status {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ProgressEvent::Error {
            message: message.into(),
        }
    }

    /// Wire name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            ProgressEvent::Status { .. } => "status",
            ProgressEvent::Progress { .. } => "progress",
            ProgressEvent::Complete { .. } => "complete",
            ProgressEvent::Error { .. } => "error",
        }
    }
}

/// Summary carried by the `complete` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSummary {
    pub headers_requested: u32,
    pub headers_successful: u32,
    pub profiles_requested: u32,
    pub profiles_successful: u32,
    /// One decimal, e.g. `"66.7%"`.
    pub success_rate: String,
    pub output_directory: String,
}

impl CompletionSummary {
    pub fn from_stats(stats: &RunStatistics, output_directory: impl Into<String>) -> Self {
        Self {
            headers_requested: stats.headers_requested,
            headers_successful: stats.headers_successful,
            profiles_requested: stats.profiles_requested,
            profiles_successful: stats.profiles_successful,
            success_rate: format_rate(stats.success_rate(), 1),
            output_directory: output_directory.into(),
        }
    }
}
