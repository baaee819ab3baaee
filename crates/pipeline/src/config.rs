use std::path::{Path, PathBuf};
use std::time::Duration;

use xgen_core::ImageCategory;

use crate::error::PipelineError;

/// Default number of prompts per batch.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Default pause between two images of the same category.
pub const DEFAULT_IMAGE_DELAY: Duration = Duration::from_secs(3);

/// Default pause between two batches of the same category.
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_secs(15);

/// Upstream rate-limit pacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacingConfig {
    pub batch_size: usize,
    pub image_delay: Duration,
    pub batch_delay: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            image_delay: DEFAULT_IMAGE_DELAY,
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }
}

impl PacingConfig {
    /// Load pacing from environment variables with defaults.
    ///
    /// | Env Var            | Default |
    /// |--------------------|---------|
    /// | `BATCH_SIZE`       | `5`     |
    /// | `IMAGE_DELAY_SECS` | `3`     |
    /// | `BATCH_DELAY_SECS` | `15`    |
    pub fn from_env() -> Self {
        let batch_size: usize = std::env::var("BATCH_SIZE")
            .unwrap_or_else(|_| DEFAULT_BATCH_SIZE.to_string())
            .parse()
            .expect("BATCH_SIZE must be a valid usize");

        let image_delay_secs: u64 = std::env::var("IMAGE_DELAY_SECS")
            .unwrap_or_else(|_| DEFAULT_IMAGE_DELAY.as_secs().to_string())
            .parse()
            .expect("IMAGE_DELAY_SECS must be a valid u64");

        let batch_delay_secs: u64 = std::env::var("BATCH_DELAY_SECS")
            .unwrap_or_else(|_| DEFAULT_BATCH_DELAY.as_secs().to_string())
            .parse()
            .expect("BATCH_DELAY_SECS must be a valid u64");

        Self {
            batch_size,
            image_delay: Duration::from_secs(image_delay_secs),
            batch_delay: Duration::from_secs(batch_delay_secs),
        }
    }

    /// No pauses at all. Useful for local dry runs against a fake provider.
    pub fn unpaced(batch_size: usize) -> Self {
        Self {
            batch_size,
            image_delay: Duration::ZERO,
            batch_delay: Duration::ZERO,
        }
    }
}

/// Where a run writes its images and reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirs {
    pub header_dir: PathBuf,
    pub profile_dir: PathBuf,
    pub report_dir: PathBuf,
}

impl Default for OutputDirs {
    fn default() -> Self {
        Self::under("generated_images")
    }
}

impl OutputDirs {
    /// `root/headers`, `root/profiles`, reports in `root`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            header_dir: root.join("headers"),
            profile_dir: root.join("profiles"),
            report_dir: root.to_path_buf(),
        }
    }

    pub fn dir_for(&self, category: ImageCategory) -> &Path {
        match category {
            ImageCategory::Header => &self.header_dir,
            ImageCategory::Profile => &self.profile_dir,
        }
    }

    /// Create every directory. Failure here is fatal to a run.
    pub async fn create_all(&self) -> Result<(), PipelineError> {
        for dir in [&self.header_dir, &self.profile_dir, &self.report_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| PipelineError::CreateDir {
                    path: dir.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Human-readable description used in the completion summary.
    pub fn describe(&self) -> String {
        format!(
            "Headers: {}, Profiles: {}",
            absolute(&self.header_dir).display(),
            absolute(&self.profile_dir).display(),
        )
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
