//! Report documents persisted during and after a run.
//!
//! A [`ProgressReport`] is written after every batch and a single
//! [`FinalReport`] when all categories are done. Together they form the
//! audit trail of a run.

use serde::{Deserialize, Serialize};

use crate::category::ImageCategory;
use crate::request::GenerationResult;
use crate::stats::{ErrorRecord, RunStatistics};
use crate::types::Timestamp;

/// Snapshot of everything generated so far, tagged with the batch that
/// just finished.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    pub batch: String,
    pub timestamp: Timestamp,
    pub stats: RunStatistics,
    pub results: Vec<GenerationResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub requested: u32,
    pub successful: u32,
    pub failed: u32,
    /// Formatted with two decimals, e.g. `"80.00%"`.
    pub success_rate: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_requested: u32,
    pub total_successful: u32,
    pub success_rate: String,
    pub headers: CategorySummary,
    pub profiles: CategorySummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalReport {
    pub summary: ReportSummary,
    pub timestamp: Timestamp,
    pub output_directory: String,
    pub errors: Vec<ErrorRecord>,
}

impl FinalReport {
    pub fn from_stats(
        stats: &RunStatistics,
        output_directory: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            summary: ReportSummary {
                total_requested: stats.total_requested(),
                total_successful: stats.total_successful(),
                success_rate: format_rate(stats.success_rate(), 2),
                headers: category_summary(stats, ImageCategory::Header),
                profiles: category_summary(stats, ImageCategory::Profile),
            },
            timestamp,
            output_directory: output_directory.into(),
            errors: stats.errors.clone(),
        }
    }
}

fn category_summary(stats: &RunStatistics, category: ImageCategory) -> CategorySummary {
    CategorySummary {
        requested: stats.requested(category),
        successful: stats.successful(category),
        failed: stats.failed(category),
        success_rate: format_rate(stats.category_success_rate(category), 2),
    }
}

/// Format a percentage with a fixed number of decimals and a `%` suffix.
pub fn format_rate(rate: f64, decimals: usize) -> String {
    format!("{rate:.decimals$}%")
}

/// `progress_{batch}.json`
pub fn progress_report_filename(batch: &str) -> String {
    format!("progress_{batch}.json")
}

/// `final_report_YYYYMMDD_HHMMSS.json`
pub fn final_report_filename(now: Timestamp) -> String {
    format!("final_report_{}.json", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn final_report_filename_embeds_timestamp() {
        let ts = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(final_report_filename(ts), "final_report_20240309_140507.json");
    }

    #[test]
    fn progress_report_filename_embeds_batch() {
        assert_eq!(
            progress_report_filename("profiles_batch_2"),
            "progress_profiles_batch_2.json"
        );
    }

    #[test]
    fn summary_reports_failures_per_category() {
        let mut stats = RunStatistics::new(4, 1);
        for _ in 0..3 {
            stats.record_success(ImageCategory::Header);
        }
        stats.record_failure(ImageCategory::Header, 4, "Rate limit exceeded");
        stats.record_success(ImageCategory::Profile);

        let report = FinalReport::from_stats(&stats, "generated_images", chrono::Utc::now());

        assert_eq!(report.summary.total_requested, 5);
        assert_eq!(report.summary.total_successful, 4);
        assert_eq!(report.summary.success_rate, "80.00%");
        assert_eq!(report.summary.headers.failed, 1);
        assert_eq!(report.summary.headers.success_rate, "75.00%");
        assert_eq!(report.summary.profiles.failed, 0);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn empty_run_reports_zero_rate() {
        let report =
            FinalReport::from_stats(&RunStatistics::new(0, 0), "out", chrono::Utc::now());
        assert_eq!(report.summary.success_rate, "0.00%");
    }

    #[test]
    fn format_rate_respects_decimals() {
        assert_eq!(format_rate(100.0, 1), "100.0%");
        assert_eq!(format_rate(33.3333, 2), "33.33%");
    }
}
