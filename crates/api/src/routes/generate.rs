//! `GET /generate`: start a run and stream its progress as Server-Sent Events.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::HeaderName;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use validator::{Validate, ValidateArgs, ValidationError};
use xgen_events::ProgressChannel;
use xgen_pipeline::{GenerationWorker, ImageCounts, OutputDirs};

use crate::config::DisconnectPolicy;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Images per category when the query leaves a count out.
pub const DEFAULT_COUNT: usize = 150;

/// Limits the query is checked against, taken from server configuration.
#[derive(Debug, Clone, Copy)]
pub struct GenerateLimits {
    pub max_images_per_category: usize,
}

/// Query string of `/generate`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(context = GenerateLimits)]
pub struct GenerateParams {
    #[serde(default = "default_count")]
    #[validate(custom(function = "validate_count", use_context))]
    pub headers: usize,

    #[serde(default = "default_count")]
    #[validate(custom(function = "validate_count", use_context))]
    pub profiles: usize,

    #[validate(length(min = 1, max = 4096))]
    pub header_folder: Option<String>,

    #[validate(length(min = 1, max = 4096))]
    pub profile_folder: Option<String>,
}

fn default_count() -> usize {
    DEFAULT_COUNT
}

fn validate_count(count: usize, limits: &GenerateLimits) -> Result<(), ValidationError> {
    if count > limits.max_images_per_category {
        let mut error = ValidationError::new("too_many_images");
        error.message = Some(
            format!(
                "at most {} images per category",
                limits.max_images_per_category
            )
            .into(),
        );
        return Err(error);
    }
    Ok(())
}

impl GenerateParams {
    pub fn counts(&self) -> ImageCounts {
        ImageCounts::new(self.headers, self.profiles)
    }

    /// Server defaults with the requested image folders applied.
    pub fn output_dirs(&self, defaults: &OutputDirs) -> OutputDirs {
        let mut output = defaults.clone();
        if let Some(folder) = &self.header_folder {
            output.header_dir = PathBuf::from(folder);
        }
        if let Some(folder) = &self.profile_folder {
            output.profile_dir = PathBuf::from(folder);
        }
        output
    }
}

/// Validate the query, hand a new run to the registry and return its event
/// stream as the response body.
///
/// Per-image failures never change the status code; they arrive as
/// `progress` events inside the stream.
pub async fn generate(
    State(state): State<AppState>,
    query: Result<Query<GenerateParams>, QueryRejection>,
) -> AppResult<Response> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    params.validate_with_args(&GenerateLimits {
        max_images_per_category: state.config.max_images_per_category,
    })?;

    let counts = params.counts();
    let output = params.output_dirs(&state.config.output);
    tracing::info!(
        headers = counts.headers,
        profiles = counts.profiles,
        header_dir = %output.header_dir.display(),
        profile_dir = %output.profile_dir.display(),
        "Generation requested",
    );

    let (channel, stream) = ProgressChannel::open();
    let cancel = CancellationToken::new();
    let stream = match state.config.on_disconnect {
        DisconnectPolicy::Cancel => stream.cancel_on_drop(cancel.clone()),
        DisconnectPolicy::Finish => stream,
    };

    let worker = GenerationWorker::new(
        Arc::clone(&state.provider),
        Arc::new(channel),
        state.config.pacing.clone(),
        output,
    );
    let prompts = Arc::clone(&state.prompts);
    let run_cancel = cancel.clone();

    state.runs.start(state.config.allow_concurrent_runs, cancel, |ticket| async move {
        // Failures were already reported on the stream and in the log.
        let _ = worker.generate(counts, prompts.as_ref(), &run_cancel).await;
        // Release the slot before the worker's channel closes the stream.
        ticket.finish();
        drop(worker);
    })?;

    Ok((
        [
            (CONTENT_TYPE, "text/event-stream"),
            (CACHE_CONTROL, "no-cache"),
            (HeaderName::from_static("x-accel-buffering"), "no"),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}
