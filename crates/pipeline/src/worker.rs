//! The generation worker.
//!
//! One worker drives one run. It owns the run's [`RunStatistics`] for the
//! whole run and hands them back when it finishes; nothing else reads or
//! writes them in the meantime.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use xgen_core::naming::image_filename;
use xgen_core::prompts::PromptSource;
use xgen_core::types::ImageId;
use xgen_core::{
    GenerationPlan, GenerationRequest, GenerationResult, ImageCategory, RunStatistics,
};
use xgen_events::{CompletionSummary, ProgressEvent, ProgressSink};
use xgen_imagen::ImageProvider;

use crate::config::{OutputDirs, PacingConfig};
use crate::error::PipelineError;
use crate::report::ReportWriter;

/// How many images of each category a run should produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageCounts {
    pub headers: usize,
    pub profiles: usize,
}

impl ImageCounts {
    pub fn new(headers: usize, profiles: usize) -> Self {
        Self { headers, profiles }
    }
}

/// Sequential, paced image generation with progress reporting.
pub struct GenerationWorker {
    provider: Arc<dyn ImageProvider>,
    sink: Arc<dyn ProgressSink>,
    pacing: PacingConfig,
    output: OutputDirs,
}

/// Mutable state of a single run.
struct RunState {
    stats: RunStatistics,
    results: Vec<GenerationResult>,
}

impl GenerationWorker {
    pub fn new(
        provider: Arc<dyn ImageProvider>,
        sink: Arc<dyn ProgressSink>,
        pacing: PacingConfig,
        output: OutputDirs,
    ) -> Self {
        Self {
            provider,
            sink,
            pacing,
            output,
        }
    }

    /// Build prompts for `counts` from `prompts`, then [`run`](Self::run)
    /// the resulting plan.
    ///
    /// A prompt-source failure is fatal: an `error` event is emitted and
    /// nothing is generated.
    pub async fn generate(
        &self,
        counts: ImageCounts,
        prompts: &dyn PromptSource,
        cancel: &CancellationToken,
    ) -> Result<RunStatistics, PipelineError> {
        self.sink.emit(ProgressEvent::status(format!(
            "Starting generation of {} headers and {} profiles...",
            counts.headers, counts.profiles
        )));

        let plan = match build_plan(counts, prompts) {
            Ok(plan) => plan,
            Err(e) => return Err(self.abort(e)),
        };

        self.run(plan, cancel).await
    }

    /// Execute a plan to completion.
    ///
    /// Emits a `status` and a `progress` event per image and a final
    /// `complete` event. Any orchestration failure, including cancellation,
    /// emits a single `error` event and is returned; images already saved
    /// stay on disk.
    pub async fn run(
        &self,
        plan: GenerationPlan,
        cancel: &CancellationToken,
    ) -> Result<RunStatistics, PipelineError> {
        let run_id = uuid::Uuid::now_v7();
        let span = tracing::info_span!(
            "generation_run",
            %run_id,
            headers = plan.headers.len(),
            profiles = plan.profiles.len(),
        );

        match self.execute(&plan, cancel).instrument(span).await {
            Ok(stats) => Ok(stats),
            Err(e) => Err(self.abort(e)),
        }
    }

    async fn execute(
        &self,
        plan: &GenerationPlan,
        cancel: &CancellationToken,
    ) -> Result<RunStatistics, PipelineError> {
        tracing::info!(total = plan.total(), "Starting generation run");
        self.output.create_all().await?;

        let reports = ReportWriter::new(&self.output.report_dir);
        let mut state = RunState {
            stats: RunStatistics::new(
                plan.headers.len() as u32,
                plan.profiles.len() as u32,
            ),
            results: Vec::with_capacity(plan.total()),
        };

        for category in ImageCategory::ALL {
            self.run_category(plan.request(category), &reports, &mut state, cancel)
                .await?;
        }

        let report_path = reports
            .write_final(&state.stats, chrono::Utc::now())
            .await?;
        tracing::info!(
            headers = state.stats.headers_successful,
            headers_requested = state.stats.headers_requested,
            profiles = state.stats.profiles_successful,
            profiles_requested = state.stats.profiles_requested,
            success_rate = state.stats.success_rate(),
            report = %report_path.display(),
            "Generation run complete",
        );

        self.sink.emit(ProgressEvent::Complete {
            summary: CompletionSummary::from_stats(&state.stats, self.output.describe()),
        });

        Ok(state.stats)
    }

    async fn run_category(
        &self,
        request: &GenerationRequest,
        reports: &ReportWriter,
        state: &mut RunState,
        cancel: &CancellationToken,
    ) -> Result<(), PipelineError> {
        let category = request.category();
        if request.is_empty() {
            return Ok(());
        }

        let batches = request
            .batches(self.pacing.batch_size)
            .map_err(PipelineError::InvalidPlan)?;
        let last_id = request.image_ids().last();

        for (index, batch) in batches.iter().enumerate() {
            tracing::info!(%category, batch = batch.number, size = batch.prompts.len(), "Processing batch");

            for (offset, prompt) in batch.prompts.iter().enumerate() {
                if cancel.is_cancelled() {
                    return Err(PipelineError::Cancelled);
                }

                let image_id = batch.start_id + offset as ImageId;
                self.generate_one(category, image_id, prompt, state).await;

                if Some(image_id) != last_id {
                    self.pause(self.pacing.image_delay, cancel).await?;
                }
            }

            reports
                .write_progress(
                    &batch.tag(category),
                    &state.stats,
                    &state.results,
                    chrono::Utc::now(),
                )
                .await?;

            if index + 1 < batches.len() {
                tracing::info!(
                    delay_secs = self.pacing.batch_delay.as_secs(),
                    "Pausing before next batch",
                );
                self.pause(self.pacing.batch_delay, cancel).await?;
            }
        }

        Ok(())
    }

    /// Generate, save and record one image. Never fails the run.
    async fn generate_one(
        &self,
        category: ImageCategory,
        image_id: ImageId,
        prompt: &str,
        state: &mut RunState,
    ) {
        self.sink.emit(ProgressEvent::status(format!(
            "Generating {category} image {image_id}..."
        )));

        let outcome = self
            .provider
            .generate(prompt, category.aspect_ratio())
            .await;

        let result = match outcome.into_result() {
            Ok(bytes) => self.save(category, image_id, &bytes).await,
            Err(error) => GenerationResult::failed(category, image_id, error),
        };

        match &result.error {
            None => state.stats.record_success(category),
            Some(error) => {
                tracing::warn!(%category, image_id, %error, "Image failed");
                state.stats.record_failure(category, image_id, error.clone());
            }
        }

        self.sink.emit(ProgressEvent::Progress {
            image_id,
            image_type: category,
            success: result.success,
            error: result.error.clone(),
        });
        state.results.push(result);
    }

    async fn save(&self, category: ImageCategory, image_id: ImageId, bytes: &[u8]) -> GenerationResult {
        let filename = image_filename(category, image_id);
        let path = self.output.dir_for(category).join(&filename);

        match tokio::fs::write(&path, bytes).await {
            Ok(()) => {
                tracing::info!(%category, path = %path.display(), "Saved image");
                GenerationResult::succeeded(category, image_id)
            }
            Err(e) => GenerationResult::failed(
                category,
                image_id,
                format!("Failed to save image {filename}: {e}"),
            ),
        }
    }

    /// Sleep for `delay`, waking early if the run is cancelled.
    async fn pause(&self, delay: Duration, cancel: &CancellationToken) -> Result<(), PipelineError> {
        if delay.is_zero() {
            return Ok(());
        }
        tokio::select! {
            _ = cancel.cancelled() => Err(PipelineError::Cancelled),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }

    /// Report a fatal error to the sink and the log, then hand it back.
    fn abort(&self, error: PipelineError) -> PipelineError {
        match &error {
            PipelineError::Cancelled => tracing::info!("Generation run cancelled"),
            other => tracing::error!(error = %other, "Generation run failed"),
        }
        self.sink.emit(ProgressEvent::error(error.to_string()));
        error
    }
}

fn build_plan(
    counts: ImageCounts,
    prompts: &dyn PromptSource,
) -> Result<GenerationPlan, PipelineError> {
    let headers = prompts
        .prompts(ImageCategory::Header, counts.headers)
        .map_err(PipelineError::Prompt)?;
    let profiles = prompts
        .prompts(ImageCategory::Profile, counts.profiles)
        .map_err(PipelineError::Prompt)?;
    Ok(GenerationPlan::from_prompts(headers, profiles))
}
