//! Run statistics accumulator.
//!
//! A [`RunStatistics`] is owned by exactly one worker for the lifetime of
//! one run. It is created fresh per run and handed back to the caller when
//! the run finishes.

use serde::{Deserialize, Serialize};

use crate::category::ImageCategory;
use crate::types::ImageId;

/// A failed image, as recorded in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub image_id: ImageId,
    #[serde(rename = "type")]
    pub image_type: ImageCategory,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub headers_requested: u32,
    pub headers_successful: u32,
    pub profiles_requested: u32,
    pub profiles_successful: u32,
    pub errors: Vec<ErrorRecord>,
}

impl RunStatistics {
    pub fn new(headers_requested: u32, profiles_requested: u32) -> Self {
        Self {
            headers_requested,
            profiles_requested,
            ..Default::default()
        }
    }

    pub fn record_success(&mut self, category: ImageCategory) {
        match category {
            ImageCategory::Header => self.headers_successful += 1,
            ImageCategory::Profile => self.profiles_successful += 1,
        }
    }

    pub fn record_failure(
        &mut self,
        category: ImageCategory,
        image_id: ImageId,
        error: impl Into<String>,
    ) {
        self.errors.push(ErrorRecord {
            image_id,
            image_type: category,
            error: error.into(),
        });
    }

    pub fn requested(&self, category: ImageCategory) -> u32 {
        match category {
            ImageCategory::Header => self.headers_requested,
            ImageCategory::Profile => self.profiles_requested,
        }
    }

    pub fn successful(&self, category: ImageCategory) -> u32 {
        match category {
            ImageCategory::Header => self.headers_successful,
            ImageCategory::Profile => self.profiles_successful,
        }
    }

    /// Requested minus successful. Saturates so a cancelled run never
    /// underflows.
    pub fn failed(&self, category: ImageCategory) -> u32 {
        self.requested(category)
            .saturating_sub(self.successful(category))
    }

    pub fn total_requested(&self) -> u32 {
        self.headers_requested + self.profiles_requested
    }

    pub fn total_successful(&self) -> u32 {
        self.headers_successful + self.profiles_successful
    }

    /// Overall success rate as a percentage. `0.0` when nothing was requested.
    pub fn success_rate(&self) -> f64 {
        percentage(self.total_successful(), self.total_requested())
    }

    /// Success rate for a single category. `0.0` when nothing was requested.
    pub fn category_success_rate(&self, category: ImageCategory) -> f64 {
        percentage(self.successful(category), self.requested(category))
    }
}

fn percentage(part: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(part) / f64::from(total) * 100.0
}
