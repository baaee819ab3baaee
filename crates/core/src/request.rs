//! Run requests, plans and per-image results.

use serde::{Deserialize, Serialize};

use crate::category::ImageCategory;
use crate::error::CoreError;
use crate::naming::image_filename;
use crate::types::ImageId;

/// Ordered prompts for one category plus the id the first image gets.
///
/// Immutable once constructed; the worker only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    category: ImageCategory,
    prompts: Vec<String>,
    start_id: ImageId,
}

/// A contiguous slice of a request processed before a pause.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    /// 1-based batch number within the category.
    pub number: usize,
    /// Id of the first image in this batch.
    pub start_id: ImageId,
    pub prompts: &'a [String],
}

impl Batch<'_> {
    /// Tag used to name the per-batch progress report, e.g. `headers_batch_2`.
    pub fn tag(&self, category: ImageCategory) -> String {
        format!("{}_batch_{}", category.plural(), self.number)
    }
}

impl GenerationRequest {
    pub fn new(category: ImageCategory, prompts: Vec<String>, start_id: ImageId) -> Self {
        Self {
            category,
            prompts,
            start_id,
        }
    }

    pub fn category(&self) -> ImageCategory {
        self.category
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Ids of every image in this request, in order.
    pub fn image_ids(&self) -> std::ops::Range<ImageId> {
        self.start_id..self.start_id + self.prompts.len() as ImageId
    }

    /// Split the prompts into consecutive batches of at most `size`.
    pub fn batches(&self, size: usize) -> Result<Vec<Batch<'_>>, CoreError> {
        if size == 0 {
            return Err(CoreError::Validation(
                "batch size must be at least 1".to_string(),
            ));
        }

        Ok(self
            .prompts
            .chunks(size)
            .enumerate()
            .map(|(index, prompts)| Batch {
                number: index + 1,
                start_id: self.start_id + (index * size) as ImageId,
                prompts,
            })
            .collect())
    }
}

/// Both categories of a run, in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    pub headers: GenerationRequest,
    pub profiles: GenerationRequest,
}

impl GenerationPlan {
    /// Number headers `1..=H` and profiles `H+1..=H+P` so ids never collide
    /// across categories.
    pub fn from_prompts(header_prompts: Vec<String>, profile_prompts: Vec<String>) -> Self {
        let header_count = header_prompts.len() as ImageId;
        Self {
            headers: GenerationRequest::new(ImageCategory::Header, header_prompts, 1),
            profiles: GenerationRequest::new(
                ImageCategory::Profile,
                profile_prompts,
                header_count + 1,
            ),
        }
    }

    pub fn request(&self, category: ImageCategory) -> &GenerationRequest {
        match category {
            ImageCategory::Header => &self.headers,
            ImageCategory::Profile => &self.profiles,
        }
    }

    pub fn total(&self) -> usize {
        self.headers.len() + self.profiles.len()
    }
}

/// Outcome of a single prompt. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub image_id: ImageId,
    #[serde(rename = "type")]
    pub image_type: ImageCategory,
    pub success: bool,
    pub filename: Option<String>,
    pub error: Option<String>,
}

impl GenerationResult {
    pub fn succeeded(image_type: ImageCategory, image_id: ImageId) -> Self {
        Self {
            image_id,
            image_type,
            success: true,
            filename: Some(image_filename(image_type, image_id)),
            error: None,
        }
    }

    pub fn failed(image_type: ImageCategory, image_id: ImageId, error: impl Into<String>) -> Self {
        Self {
            image_id,
            image_type,
            success: false,
            filename: None,
            error: Some(error.into()),
        }
    }
}
