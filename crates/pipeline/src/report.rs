//! JSON report persistence.

use std::path::PathBuf;

use serde::Serialize;
use xgen_core::report::{
    final_report_filename, progress_report_filename, FinalReport, ProgressReport,
};
use xgen_core::types::Timestamp;
use xgen_core::{GenerationResult, RunStatistics};

use crate::error::PipelineError;

/// Writes progress snapshots and the final report into one directory.
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write `progress_<batch>.json` with every result so far.
    pub async fn write_progress(
        &self,
        batch: &str,
        stats: &RunStatistics,
        results: &[GenerationResult],
        now: Timestamp,
    ) -> Result<PathBuf, PipelineError> {
        let report = ProgressReport {
            batch: batch.to_string(),
            timestamp: now,
            stats: stats.clone(),
            results: results.to_vec(),
        };
        self.write_json(&progress_report_filename(batch), &report)
            .await
    }

    /// Write `final_report_<YYYYMMDD_HHMMSS>.json`.
    pub async fn write_final(
        &self,
        stats: &RunStatistics,
        now: Timestamp,
    ) -> Result<PathBuf, PipelineError> {
        let report = FinalReport::from_stats(stats, self.dir.display().to_string(), now);
        self.write_json(&final_report_filename(now), &report).await
    }

    async fn write_json<T: Serialize>(
        &self,
        filename: &str,
        document: &T,
    ) -> Result<PathBuf, PipelineError> {
        let path = self.dir.join(filename);
        let json = serde_json::to_vec_pretty(document)?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|source| PipelineError::WriteReport {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "Report written");
        Ok(path)
    }
}
